use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;
use tracing::warn;
use crate::controller::AppState;
use crate::helpers::truncate::truncate_message;
use crate::repositories::DatabaseStatus;

/// How many collection names the report includes.
pub const MAX_REPORTED_COLLECTIONS: usize = 10;
/// Longest error text embedded in the `database` status line.
pub const MAX_STATUS_ERROR_CHARS: usize = 50;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/test", get(get_diagnostics))
        .route_layer(Extension(app_state))
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

impl DiagnosticsReport {
    pub fn new(status: DatabaseStatus, has_url: bool, has_name: bool) -> Self {
        let (database, connection_status, collections) = match status {
            DatabaseStatus::Connected { mut collections, .. } => {
                collections.truncate(MAX_REPORTED_COLLECTIONS);
                ("✅ Connected & Working".to_string(), "Connected", collections)
            }
            DatabaseStatus::Degraded { reason, .. } => (
                format!(
                    "⚠️  Connected but Error: {}",
                    truncate_message(&reason, MAX_STATUS_ERROR_CHARS)
                ),
                "Connected",
                Vec::new(),
            ),
            DatabaseStatus::Unreachable { .. } => (
                "⚠️  Available but not initialized".to_string(),
                "Not Connected",
                Vec::new(),
            ),
        };

        Self {
            backend: "✅ Running".to_string(),
            database,
            database_url: presence(has_url),
            database_name: presence(has_name),
            connection_status: connection_status.to_string(),
            collections,
        }
    }
}

fn presence(set: bool) -> String {
    let label = if set { "✅ Set" } else { "❌ Not Set" };
    label.to_string()
}

/// Best-effort connectivity snapshot. Always answers 200; failures only show
/// up in the status strings.
pub async fn get_diagnostics(Extension(app_state): Extension<AppState>) -> Json<DiagnosticsReport> {
    let status = app_state.database.probe().await;
    match &status {
        DatabaseStatus::Degraded { database, reason } => {
            warn!("Diagnostics could not list collections of {} due to: {}", database, reason);
        }
        DatabaseStatus::Unreachable { reason } => {
            warn!("Diagnostics found no initialized database: {}", reason);
        }
        DatabaseStatus::Connected { .. } => {}
    }

    Json(DiagnosticsReport::new(
        status,
        app_state.config.has_database_url(),
        app_state.config.has_database_name(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_report_caps_collections() {
        let collections: Vec<String> = (0..15).map(|i| format!("c{i}")).collect();
        let report = DiagnosticsReport::new(
            DatabaseStatus::Connected {
                database: "divines".into(),
                collections,
            },
            true,
            true,
        );

        assert_eq!(report.database, "✅ Connected & Working");
        assert_eq!(report.connection_status, "Connected");
        assert_eq!(report.collections.len(), MAX_REPORTED_COLLECTIONS);
        assert_eq!(report.database_url, "✅ Set");
    }

    #[test]
    fn degraded_report_truncates_reason() {
        let report = DiagnosticsReport::new(
            DatabaseStatus::Degraded {
                database: "divines".into(),
                reason: "x".repeat(120),
            },
            true,
            false,
        );

        assert_eq!(
            report.database,
            format!("⚠️  Connected but Error: {}", "x".repeat(MAX_STATUS_ERROR_CHARS))
        );
        assert_eq!(report.database_name, "❌ Not Set");
        assert!(report.collections.is_empty());
    }

    #[test]
    fn unreachable_report_is_not_connected() {
        let report = DiagnosticsReport::new(
            DatabaseStatus::Unreachable {
                reason: "database is not configured".into(),
            },
            false,
            false,
        );

        assert_eq!(report.backend, "✅ Running");
        assert_eq!(report.database, "⚠️  Available but not initialized");
        assert_eq!(report.connection_status, "Not Connected");
    }
}
