use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use std::sync::Arc;

use crate::handlers::AppState;
use crate::models::{DashboardAction, UpdateResult};
use crate::update::UpdateError;
use crate::utils::format_duration;

/// POST /update - Spustí update skript a vrátí jeho výsledek
pub async fn run_update(State(state): State<Arc<AppState>>) -> (StatusCode, Json<UpdateResult>) {
    let mut ticket = match state.updater.try_start() {
        Ok(ticket) => ticket,
        Err(e) => {
            tracing::warn!("Rejected update request: {}", e);
            return (
                StatusCode::CONFLICT,
                Json(UpdateResult::failed("Update already in progress", e.to_string())),
            );
        }
    };

    state.dispatch(DashboardAction::UpdateStarted).await;

    // Běh i výsledek patří samostatnému tasku, odpojení klienta update nepřeruší
    let task_state = state.clone();
    let task = tokio::spawn(async move {
        let result = ticket.run().await;

        // Snapshot se aktualizuje dřív, než ticket uvolní runner
        match &result {
            Ok(output) => {
                tracing::info!("System updated successfully in {}", format_duration(output.elapsed));
                task_state
                    .dispatch(DashboardAction::UpdateSucceeded { at: Utc::now() })
                    .await;
            }
            Err(e) => {
                tracing::error!("Update failed: {}", e);
                task_state
                    .dispatch(DashboardAction::UpdateFailed {
                        message: failure_message(e),
                    })
                    .await;
            }
        }

        drop(ticket);
        result
    });

    match task.await {
        Ok(Ok(output)) => (StatusCode::OK, Json(UpdateResult::succeeded(output.stdout))),
        Ok(Err(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(UpdateResult::failed("Update failed", e.to_string())),
        ),
        Err(e) => {
            tracing::error!("Update task panicked: {}", e);
            state
                .dispatch(DashboardAction::UpdateFailed {
                    message: "Update failed: internal error".to_string(),
                })
                .await;
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(UpdateResult::failed("Update failed", e.to_string())),
            )
        }
    }
}

/// Text pro banner na dashboardu
fn failure_message(e: &UpdateError) -> String {
    match e {
        UpdateError::TimedOut { .. } => "Update timed out. Please try again.".to_string(),
        _ => format!("Update failed: {}", e),
    }
}
