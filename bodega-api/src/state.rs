use bodega_catalog::{CatalogService, ProductRepository};
use bodega_customer::{CustomerRepository, CustomerService};
use bodega_order::{AllocationLock, OrderRepository, OrderService, ReconciliationEngine};
use bodega_shared::events::OrderAvailableEvent;
use bodega_store::app_config::BusinessRules;
use bodega_store::{MemoryCustomerRepository, MemoryOrderRepository, MemoryProductRepository};
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub customers: Arc<CustomerService>,
    pub orders: Arc<OrderService>,
    pub engine: Arc<ReconciliationEngine>,
    pub notify_tx: broadcast::Sender<OrderAvailableEvent>,
    pub business_rules: BusinessRules,
}

impl AppState {
    /// Wires the services and the engine over whichever repositories the
    /// caller provides. The allocation lock is shared between the order
    /// service and the engine so every read-check-decrement path serializes.
    pub fn new(
        products: Arc<dyn ProductRepository>,
        customers: Arc<dyn CustomerRepository>,
        orders: Arc<dyn OrderRepository>,
        business_rules: BusinessRules,
    ) -> Self {
        let lock = AllocationLock::new();
        let (notify_tx, _) = broadcast::channel(100);

        Self {
            catalog: Arc::new(CatalogService::new(products.clone())),
            customers: Arc::new(CustomerService::new(customers.clone())),
            orders: Arc::new(OrderService::new(
                orders.clone(),
                products.clone(),
                customers,
                lock.clone(),
            )),
            engine: Arc::new(ReconciliationEngine::new(products, orders, lock)),
            notify_tx,
            business_rules,
        }
    }

    /// In-memory wiring for tests and database-less local runs.
    pub fn in_memory(business_rules: BusinessRules) -> Self {
        Self::new(
            Arc::new(MemoryProductRepository::new()),
            Arc::new(MemoryCustomerRepository::new()),
            Arc::new(MemoryOrderRepository::new()),
            business_rules,
        )
    }
}
