//! Customer endpoints.

use crate::api::{with_conn, ApiError, IdPath};
use crate::AppState;
use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::Json,
};
use lunchly_models::{Customer, Reservation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A customer as returned by the API, with the derived full name.
#[derive(Debug, Serialize)]
pub struct CustomerView {
    #[serde(flatten)]
    pub customer: Customer,
    pub full_name: String,
}

impl From<Customer> for CustomerView {
    fn from(customer: Customer) -> Self {
        let full_name = customer.full_name();
        Self {
            customer,
            full_name,
        }
    }
}

/// A customer together with its reservations.
#[derive(Debug, Serialize)]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: CustomerView,
    pub reservations: Vec<Reservation>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
}

/// Body for creating or editing a customer.
#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// GET /api/customers
///
/// With `?search=term`, only customers whose first or last name contains
/// the term (case-insensitive) are returned.
pub async fn list_customers_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<CustomerView>>, ApiError> {
    let customers = with_conn(&state.pool, move |conn| {
        let customers = match params.search.as_deref() {
            Some(term) => Customer::search(conn, term)?,
            None => Customer::all(conn)?,
        };
        Ok(customers)
    })
    .await?;

    Ok(Json(customers.into_iter().map(CustomerView::from).collect()))
}

/// POST /api/customers
pub async fn create_customer_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CustomerRequest>,
) -> Result<(StatusCode, Json<CustomerView>), ApiError> {
    let mut customer = Customer::new(
        payload.first_name,
        payload.last_name,
        payload.phone,
        payload.notes,
    );

    let customer = with_conn(&state.pool, move |conn| {
        customer.save(conn)?;
        Ok(customer)
    })
    .await?;

    tracing::info!(customer_id = customer.id(), "customer created");
    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// GET /api/customers/top-ten
pub async fn top_ten_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<CustomerView>>, ApiError> {
    let customers = with_conn(&state.pool, |conn| Ok(Customer::top_ten(conn)?)).await?;
    Ok(Json(customers.into_iter().map(CustomerView::from).collect()))
}

/// GET /api/customers/{id}
pub async fn get_customer_handler(
    Extension(state): Extension<Arc<AppState>>,
    IdPath(id): IdPath,
) -> Result<Json<CustomerDetail>, ApiError> {
    let (customer, reservations) = with_conn(&state.pool, move |conn| {
        let customer = Customer::get(conn, id)?;
        let reservations = customer.reservations(conn)?;
        Ok((customer, reservations))
    })
    .await?;

    Ok(Json(CustomerDetail {
        customer: customer.into(),
        reservations,
    }))
}

/// PUT /api/customers/{id}
///
/// Overwrites every mutable field; there is no version check.
pub async fn update_customer_handler(
    Extension(state): Extension<Arc<AppState>>,
    IdPath(id): IdPath,
    Json(payload): Json<CustomerRequest>,
) -> Result<Json<CustomerView>, ApiError> {
    let customer = with_conn(&state.pool, move |conn| {
        let mut customer = Customer::get(conn, id)?;
        customer.first_name = payload.first_name;
        customer.last_name = payload.last_name;
        customer.phone = payload.phone;
        customer.notes = payload.notes;
        customer.save(conn)?;
        Ok(customer)
    })
    .await?;

    tracing::info!(customer_id = id, "customer updated");
    Ok(Json(customer.into()))
}
