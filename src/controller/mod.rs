use std::sync::Arc;
use anyhow::Context;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use crate::config::Config;
use crate::helpers::handler_404::page_not_found_handler;
use crate::repositories::Database;

pub mod diagnostics_controller;
pub mod health_check;
pub mod reservation_controller;

/// Everything a handler may depend on, built once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(database: Database, config: Config) -> Self {
        Self {
            database,
            config: Arc::new(config),
        }
    }
}

pub async fn serve(app_state: AppState) -> anyhow::Result<()> {
    let address = app_state.config.socket_addr();
    let application = application(app_state);

    info!("API server listening on: {}", address);
    axum::Server::try_bind(&address)
        .with_context(|| format!("Error binding the API server to {}", address))?
        .serve(application.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Error spinning up the API server")
}

/// The full HTTP surface: routes, CORS, compression, request tracing and the
/// JSON 404 fallback.
pub fn application(app_state: AppState) -> Router {
    router_endpoints(app_state)
        .fallback(page_not_found_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    // Credentials rule out the `*` wildcard, so everything is mirrored instead.
                    CorsLayer::new()
                        .allow_origin(AllowOrigin::mirror_request())
                        .allow_methods(AllowMethods::mirror_request())
                        .allow_headers(AllowHeaders::mirror_request())
                        .allow_credentials(true)
                )
        )
}

pub fn router_endpoints(app_state: AppState) -> Router {
    health_check::router()
        .merge(diagnostics_controller::router(app_state.clone()))
        .merge(reservation_controller::router(app_state))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal due to: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining in-flight requests");
}
