use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Json},
};
use askama::Template;
use std::sync::Arc;

use crate::handlers::AppState;
use crate::models::DashboardState;
use crate::templates::{DashboardTemplate, PageContext};

/// GET /dashboard - Zobrazí stav služeb
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let template = DashboardTemplate {
        ctx: PageContext::new("Server Status"),
        state: state.snapshot().await,
    };

    template.render()
        .map(Html)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// GET /services - Aktuální snapshot jako JSON
pub async fn services(State(state): State<Arc<AppState>>) -> Json<DashboardState> {
    Json(state.snapshot().await.as_ref().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{router, testing::send};
    use crate::models::DashboardAction;
    use crate::update::runner::testing::missing_script_runner;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(missing_script_runner()))
    }

    #[tokio::test]
    async fn test_dashboard_lists_services() {
        let (status, body) = send(router(state()), "GET", "/dashboard").await;
        assert_eq!(status, StatusCode::OK);

        for name in ["Nginx", "Docker", "Prometheus", "Grafana"] {
            assert!(body.contains(name), "missing {}", name);
        }
        assert!(body.contains("grafana.isp-pybox.gvec.net"));
        assert!(body.contains("Update System"));
        assert!(!body.contains("update-error\""));
    }

    #[tokio::test]
    async fn test_dashboard_disables_button_while_updating() {
        let state = state();
        state.dispatch(DashboardAction::UpdateStarted).await;

        let (_, body) = send(router(state.clone()), "GET", "/dashboard").await;
        assert!(body.contains("Updating..."));
        assert!(body.contains("disabled"));

        state
            .dispatch(DashboardAction::UpdateFailed {
                message: "Update failed: <boom>".to_string(),
            })
            .await;

        let (_, body) = send(router(state), "GET", "/dashboard").await;
        assert!(body.contains("Update System"));
        assert!(!body.contains("disabled"));
        assert!(body.contains("id=\"update-error\""));
        assert!(body.contains("Update failed: &lt;boom&gt;"));
    }

    #[tokio::test]
    async fn test_services_json() {
        let (status, body) = send(router(state()), "GET", "/services").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["isUpdating"], false);
        assert_eq!(json["services"].as_array().unwrap().len(), 4);
        assert_eq!(json["services"][0]["name"], "Nginx");
        assert_eq!(json["services"][0]["status"], "running");
    }
}
