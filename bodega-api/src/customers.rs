use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bodega_customer::{Customer, CustomerPatch, NewCustomer};
use bodega_shared::pii::Masked;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Customer as served over the wire. Contact details are wrapped so a stray
/// debug log of a response never leaks them.
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: Masked<String>,
    pub email: Masked<String>,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            phone: Masked(customer.phone),
            email: Masked(customer.email),
            registered_at: customer.registered_at,
            updated_at: customer.updated_at,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/customers", get(list_customers).post(create_customer))
        .route(
            "/v1/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

/// GET /v1/customers
async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let customers = state.customers.list().await?;
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

/// POST /v1/customers
async fn create_customer(
    State(state): State<AppState>,
    Json(req): Json<NewCustomer>,
) -> Result<(StatusCode, Json<CustomerResponse>), AppError> {
    let customer = state.customers.create(req).await?;
    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// GET /v1/customers/{id}
async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerResponse>, AppError> {
    Ok(Json(state.customers.get(id).await?.into()))
}

/// PUT /v1/customers/{id}
async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CustomerPatch>,
) -> Result<Json<CustomerResponse>, AppError> {
    Ok(Json(state.customers.update(id, req).await?.into()))
}

/// DELETE /v1/customers/{id}
async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.customers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
