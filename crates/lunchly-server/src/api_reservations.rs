//! Reservation endpoints, nested under a customer.

use crate::api::{with_conn, ApiError, IdPath};
use crate::AppState;
use axum::{
    extract::Extension,
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use lunchly_models::{Customer, Reservation};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ReservationRequest {
    /// RFC 3339 timestamp; converted to UTC.
    pub start_at: DateTime<Utc>,
    pub num_guests: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

/// GET /api/customers/{id}/reservations
pub async fn list_reservations_handler(
    Extension(state): Extension<Arc<AppState>>,
    IdPath(customer_id): IdPath,
) -> Result<Json<Vec<Reservation>>, ApiError> {
    let reservations = with_conn(&state.pool, move |conn| {
        let customer = Customer::get(conn, customer_id)?;
        Ok(customer.reservations(conn)?)
    })
    .await?;

    Ok(Json(reservations))
}

/// POST /api/customers/{id}/reservations
///
/// A guest count below one is rejected by the database and reported as 400.
pub async fn create_reservation_handler(
    Extension(state): Extension<Arc<AppState>>,
    IdPath(customer_id): IdPath,
    Json(payload): Json<ReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    let reservation = with_conn(&state.pool, move |conn| {
        Customer::get(conn, customer_id)?;
        let mut reservation = Reservation::new(
            customer_id,
            payload.start_at,
            payload.num_guests,
            payload.notes,
        );
        reservation.save(conn)?;
        Ok(reservation)
    })
    .await?;

    tracing::info!(
        customer_id,
        reservation_id = reservation.id(),
        "reservation created"
    );
    Ok((StatusCode::CREATED, Json(reservation)))
}
