use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use bodega_order::{NewOrder, Order, OrderDetails, OrderPatch, OrderStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::notifications::publish_available;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    /// Optional status filter, e.g. `?status=PENDING`.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub satisfied_orders: Vec<Order>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/orders", get(list_orders).post(create_order))
        .route(
            "/v1/orders/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/v1/orders/{id}/status", put(set_order_status))
        .route("/v1/orders/verify", post(verify_availability))
}

/// GET /v1/orders
///
/// Orders joined with their customer and product references; dangling
/// references come back as null rather than failing the listing.
async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderDetails>>, AppError> {
    let details = match query.status {
        Some(raw) => {
            let status: OrderStatus = raw.parse()?;
            state.orders.list_details_by_status(status).await?
        }
        None => state.orders.list_details().await?,
    };
    Ok(Json(details))
}

/// POST /v1/orders
async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state.orders.create_order(req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /v1/orders/{id}
async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderDetails>, AppError> {
    Ok(Json(state.orders.order_details(id).await?))
}

/// PUT /v1/orders/{id}
async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<OrderPatch>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.orders.update_order(id, req).await?))
}

/// PUT /v1/orders/{id}/status
///
/// Delivery goes through the stock contract: a pending order being delivered
/// decrements stock floored at zero, an available one was already reserved.
async fn set_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.orders.set_status(id, req.status).await?))
}

/// DELETE /v1/orders/{id}
async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.orders.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/orders/verify
///
/// The manual "verify availability" action: sweep every pending order against
/// current stock and report the ones that became available.
async fn verify_availability(
    State(state): State<AppState>,
) -> Result<Json<VerifyResponse>, AppError> {
    let satisfied_orders = state.engine.verify_availability().await?;
    publish_available(&state.notify_tx, &satisfied_orders);
    Ok(Json(VerifyResponse { satisfied_orders }))
}
