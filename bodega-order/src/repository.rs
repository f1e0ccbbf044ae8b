use crate::models::{Order, OrderStatus};
use async_trait::async_trait;
use bodega_core::CoreResult;
use uuid::Uuid;

/// Repository trait for order data access.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: &Order) -> CoreResult<Uuid>;

    async fn get(&self, id: Uuid) -> CoreResult<Option<Order>>;

    async fn list(&self) -> CoreResult<Vec<Order>>;

    async fn list_by_status(&self, status: OrderStatus) -> CoreResult<Vec<Order>>;

    /// Pending orders with at least one line item referencing the product.
    /// Ordering is the engine's concern, not the store's.
    async fn list_pending_for_product(&self, product_id: Uuid) -> CoreResult<Vec<Order>>;

    async fn update(&self, order: &Order) -> CoreResult<Option<Order>>;

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> CoreResult<Option<Order>>;

    async fn delete(&self, id: Uuid) -> CoreResult<bool>;
}
