use crate::customer::Customer;
use async_trait::async_trait;
use bodega_core::CoreResult;
use uuid::Uuid;

/// Repository trait for customer data access. Same CRUD shape as the product
/// store, no reconciliation coupling.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create(&self, customer: &Customer) -> CoreResult<Uuid>;

    async fn get(&self, id: Uuid) -> CoreResult<Option<Customer>>;

    async fn list(&self) -> CoreResult<Vec<Customer>>;

    async fn update(&self, customer: &Customer) -> CoreResult<Option<Customer>>;

    async fn delete(&self, id: Uuid) -> CoreResult<bool>;
}
