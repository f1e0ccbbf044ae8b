use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use bodega_catalog::{NewProduct, Product, ProductPatch};
use bodega_order::Order;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::notifications::publish_available;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateStockRequest {
    pub stock: i32,
}

#[derive(Debug, Serialize)]
pub struct StockUpdateResponse {
    pub product: Product,
    /// Pending orders the new stock level satisfied, oldest first.
    pub satisfied_orders: Vec<Order>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/products", get(list_products).post(create_product))
        .route(
            "/v1/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/v1/products/{id}/stock", put(update_stock))
}

/// GET /v1/products
async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.catalog.list().await?))
}

/// POST /v1/products
async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state.catalog.create(req).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /v1/products/{id}
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.catalog.get(id).await?))
}

/// PUT /v1/products/{id}
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProductPatch>,
) -> Result<Json<Product>, AppError> {
    // Stock changes routed through here still reconcile: hand the stock part
    // to the engine after the field update so pending orders are re-checked.
    let stock = req.stock;
    let mut product = state.catalog.update(id, req).await?;
    if let Some(stock) = stock {
        let (updated, satisfied) = state.engine.update_stock(id, stock).await?;
        publish_available(&state.notify_tx, &satisfied);
        product = updated;
    }
    Ok(Json(product))
}

/// DELETE /v1/products/{id}
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /v1/products/{id}/stock
///
/// Sets stock to exactly the given value and runs the targeted sweep for the
/// product; newly satisfiable orders are returned and pushed to the
/// notification stream.
async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStockRequest>,
) -> Result<Json<StockUpdateResponse>, AppError> {
    let (product, satisfied_orders) = state.engine.update_stock(id, req.stock).await?;
    publish_available(&state.notify_tx, &satisfied_orders);
    Ok(Json(StockUpdateResponse {
        product,
        satisfied_orders,
    }))
}
