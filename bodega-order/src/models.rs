use bodega_catalog::Product;
use bodega_core::CoreError;
use bodega_customer::Customer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

/// Order lifecycle state.
///
/// Intended progression is Pending → Available → Delivered. Pending →
/// Delivered is also legal (direct delivery of an unreserved order). The
/// update interface tolerates arbitrary overwrites, matching the store it
/// replaces; only the delivery transition carries a stock side effect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Available,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Available => "AVAILABLE",
            OrderStatus::Delivered => "DELIVERED",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "AVAILABLE" => Ok(OrderStatus::Available),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            other => Err(CoreError::Validation(format!(
                "unknown order status: {}",
                other
            ))),
        }
    }
}

/// A (product, quantity) pair within an order. Quantity is validated to be
/// positive at the input boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// An order owns its line-item sequence; products and the customer are
/// referenced by id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub items: Vec<LineItem>,
    pub requested_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub customer_id: Uuid,
    pub items: Vec<LineItem>,
    /// Defaults to now; explicit values let callers backfill request dates.
    pub requested_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPatch {
    pub customer_id: Option<Uuid>,
    pub items: Option<Vec<LineItem>>,
    pub status: Option<OrderStatus>,
}

impl Order {
    pub fn new(customer_id: Uuid, items: Vec<LineItem>, requested_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            items,
            requested_at,
            status: OrderStatus::Pending,
            updated_at: Utc::now(),
        }
    }

    pub fn update_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Total quantity demanded per product, aggregated across line items.
    ///
    /// The availability check works on these sums: two items of the same
    /// product must be simultaneously coverable, not individually.
    pub fn required_quantities(&self) -> HashMap<Uuid, i32> {
        let mut required = HashMap::new();
        for item in &self.items {
            *required.entry(item.product_id).or_insert(0) += item.quantity;
        }
        required
    }

    pub fn references_product(&self, product_id: Uuid) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }
}

/// Order joined with its weak references. Absent customer or product records
/// surface as `None`, never as an error.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer: Option<Customer>,
    pub items: Vec<LineItemDetails>,
    pub requested_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineItemDetails {
    pub product_id: Uuid,
    pub quantity: i32,
    pub product: Option<Product>,
}
