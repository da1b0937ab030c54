pub mod dashboard;
pub mod update;

use axum::{
    response::{IntoResponse, Json, Redirect},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::models::{reduce, DashboardAction, DashboardState};
use crate::update::UpdateRunner;

pub struct AppState {
    pub updater: UpdateRunner,
    dashboard: RwLock<Arc<DashboardState>>,
}

impl AppState {
    pub fn new(updater: UpdateRunner) -> Self {
        Self {
            updater,
            dashboard: RwLock::new(Arc::new(DashboardState::new(Utc::now()))),
        }
    }

    /// Aktuální snapshot dashboardu
    pub async fn snapshot(&self) -> Arc<DashboardState> {
        self.dashboard.read().await.clone()
    }

    /// Aplikuje akci přes reducer a nahradí snapshot
    pub async fn dispatch(&self, action: DashboardAction) -> Arc<DashboardState> {
        let mut current = self.dashboard.write().await;
        let next = Arc::new(reduce(&current, action));
        *current = next.clone();
        next
    }
}

/// Sestaví axum router se všemi routami
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/update", post(update::run_update))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/services", get(dashboard::services))
        .nest_service("/static", ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root handler - redirect na dashboard
pub async fn index() -> impl IntoResponse {
    Redirect::to("/dashboard")
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}
