use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::routing::get;
use axum::{Extension, Json, Router};
use bson::{doc, Document};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use crate::controller::AppState;
use crate::error::ApiError;
use crate::helpers::json::document_to_json;
use crate::models::reservation::{Reservation, RESERVATION_COLLECTION};
use crate::repositories::Database;

pub const DEFAULT_LIST_LIMIT: u32 = 50;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/api/reservations",
            get(list_reservations).post(create_reservation),
        )
        .route_layer(Extension(app_state.database))
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CreatedReservation {
    pub ok: bool,
    pub id: String,
}

pub async fn create_reservation(
    Extension(database): Extension<Database>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CreatedReservation>, ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::Rejected {
        status: rejection.status(),
        detail: rejection.body_text(),
    })?;

    let reservation = Reservation::from_json(&body).map_err(|e| {
        warn!("Rejected reservation payload: {}", e);
        e
    })?;

    match database
        .insert(RESERVATION_COLLECTION, reservation.to_document())
        .await
    {
        Ok(id) => {
            info!("Created reservation {} for {}", id, reservation.email);
            Ok(Json(CreatedReservation { ok: true, id }))
        }
        Err(e) => {
            warn!("Something went wrong creating reservation due to: {}", e);
            Err(e.into())
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ListReservationsQuery {
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LIST_LIMIT
}

impl ListReservationsQuery {
    /// Equality filter over the non-empty query values.
    pub fn to_filter(&self) -> Document {
        let mut filter = doc! {};
        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            filter.insert("email", email);
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            filter.insert("name", name);
        }

        filter
    }
}

#[derive(Serialize, Debug)]
pub struct ReservationList {
    pub ok: bool,
    pub items: Vec<Value>,
}

pub async fn list_reservations(
    Extension(database): Extension<Database>,
    query: Result<Query<ListReservationsQuery>, QueryRejection>,
) -> Result<Json<ReservationList>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::Rejected {
        status: rejection.status(),
        detail: rejection.body_text(),
    })?;

    match database
        .find(RESERVATION_COLLECTION, query.to_filter(), query.limit)
        .await
    {
        Ok(documents) => Ok(Json(ReservationList {
            ok: true,
            items: documents.into_iter().map(document_to_json).collect(),
        })),
        Err(e) => {
            warn!("Something went wrong listing reservations due to: {}", e);
            Err(e.into())
        }
    }
}
