use crate::product::Product;
use async_trait::async_trait;
use bodega_core::CoreResult;
use uuid::Uuid;

/// Repository trait for product catalog access.
///
/// Implementations live in `bodega-store`; the engine and services only see
/// this trait so tests can substitute the in-memory store.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> CoreResult<Uuid>;

    async fn get(&self, id: Uuid) -> CoreResult<Option<Product>>;

    async fn list(&self) -> CoreResult<Vec<Product>>;

    async fn update(&self, product: &Product) -> CoreResult<Option<Product>>;

    /// Sets stock to exactly `stock` (not a delta). Returns the updated
    /// product, or `None` when the id is unknown.
    async fn set_stock(&self, id: Uuid, stock: i32) -> CoreResult<Option<Product>>;

    async fn delete(&self, id: Uuid) -> CoreResult<bool>;
}
