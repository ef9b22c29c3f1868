use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

pub const ROOT_GREETING: &str = "Hello from the Divines backend!";
pub const API_GREETING: &str = "Hello from the backend API!";

pub fn router() -> Router {
    Router::new()
        .route("/", get(get_root))
        .route("/api/hello", get(get_hello))
        .route("/health", get(get_health_check))
}

#[derive(Serialize, Debug)]
pub struct Greeting {
    pub message: &'static str,
}

async fn get_root() -> Json<Greeting> {
    Json(Greeting { message: ROOT_GREETING })
}

async fn get_hello() -> Json<Greeting> {
    Json(Greeting { message: API_GREETING })
}

/// Liveness probe for orchestrators
async fn get_health_check() -> StatusCode {
    StatusCode::OK
}
