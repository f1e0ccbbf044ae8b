use axum::{extract::State, routing::get, Json, Router};
use bodega_catalog::Product;
use bodega_order::OrderStatus;
use serde::Serialize;

use crate::customers::CustomerResponse;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OrderCounts {
    pub pending: usize,
    pub available: usize,
    pub delivered: usize,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub product_count: usize,
    pub customer_count: usize,
    pub order_counts: OrderCounts,
    /// Products at or below the configured low-stock threshold.
    pub low_stock: Vec<Product>,
    /// Most recent registrations, newest first.
    pub recent_customers: Vec<CustomerResponse>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/summary", get(get_summary))
}

/// GET /v1/summary
///
/// Single round trip for the dashboard: stock status, order pipeline counts
/// and the latest registrations.
async fn get_summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, AppError> {
    let products = state.catalog.list().await?;
    let mut customers = state.customers.list().await?;
    let orders = state.orders.list().await?;

    let threshold = state.business_rules.low_stock_threshold;
    let low_stock: Vec<Product> = products
        .iter()
        .filter(|p| p.stock <= threshold)
        .cloned()
        .collect();

    let mut order_counts = OrderCounts {
        pending: 0,
        available: 0,
        delivered: 0,
    };
    for order in &orders {
        match order.status {
            OrderStatus::Pending => order_counts.pending += 1,
            OrderStatus::Available => order_counts.available += 1,
            OrderStatus::Delivered => order_counts.delivered += 1,
        }
    }

    let customer_count = customers.len();
    customers.sort_by(|a, b| b.registered_at.cmp(&a.registered_at));
    let recent_customers: Vec<CustomerResponse> =
        customers.into_iter().take(5).map(Into::into).collect();

    Ok(Json(SummaryResponse {
        product_count: products.len(),
        customer_count,
        order_counts,
        low_stock,
        recent_customers,
    }))
}
