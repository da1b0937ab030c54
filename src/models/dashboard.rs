use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::service::{default_services, ServiceDescriptor};

/// Snapshot stavu dashboardu. Nemění se na místě, nový vzniká přes `reduce`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub services: Vec<ServiceDescriptor>,
    pub is_updating: bool,
    pub update_error: Option<String>,
}

impl DashboardState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            services: default_services(now),
            is_updating: false,
            update_error: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DashboardAction {
    UpdateStarted,
    UpdateSucceeded { at: DateTime<Utc> },
    UpdateFailed { message: String },
}

/// Vrátí nový snapshot po aplikaci akce
pub fn reduce(state: &DashboardState, action: DashboardAction) -> DashboardState {
    match action {
        DashboardAction::UpdateStarted => DashboardState {
            services: state.services.clone(),
            is_updating: true,
            update_error: None,
        },
        DashboardAction::UpdateSucceeded { at } => DashboardState {
            services: state
                .services
                .iter()
                .map(|service| ServiceDescriptor {
                    last_updated: restamp(service.last_updated, at),
                    ..service.clone()
                })
                .collect(),
            is_updating: false,
            update_error: None,
        },
        DashboardAction::UpdateFailed { message } => DashboardState {
            services: state.services.clone(),
            is_updating: false,
            update_error: Some(message),
        },
    }
}

// Nový čas musí být vždy ostře větší než předchozí
fn restamp(previous: DateTime<Utc>, at: DateTime<Utc>) -> DateTime<Utc> {
    if at > previous {
        at
    } else {
        previous + Duration::milliseconds(1)
    }
}
