use askama::Template;
use std::sync::Arc;

use crate::models::DashboardState;

// Shared context pro všechny stránky
#[derive(Clone)]
pub struct PageContext {
    pub title: String,
}

impl PageContext {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub state: Arc<DashboardState>,
}
