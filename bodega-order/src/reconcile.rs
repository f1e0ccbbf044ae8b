use crate::models::{Order, OrderStatus};
use crate::repository::OrderRepository;
use bodega_catalog::{Product, ProductRepository};
use bodega_core::{validation, CoreError, CoreResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Serializes every read-check-decrement sequence over the catalog.
///
/// The store calls themselves are suspension points, so two overlapping
/// sweeps (or a sweep racing an order creation) could both observe the same
/// stock and double-allocate it. All allocation paths (order creation,
/// delivery, both sweep entry points) must hold this lock.
#[derive(Clone, Default)]
pub struct AllocationLock(Arc<Mutex<()>>);

impl AllocationLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.0.lock().await
    }
}

/// Matches available stock against pending demand and advances order states.
///
/// Advancing an order to `Available` reserves (decrements) stock for all its
/// line items, exactly once, as part of that transition. Allocation is
/// all-or-nothing per order: line items are never partially satisfied.
pub struct ReconciliationEngine {
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
    lock: AllocationLock,
}

impl ReconciliationEngine {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        orders: Arc<dyn OrderRepository>,
        lock: AllocationLock,
    ) -> Self {
        Self {
            products,
            orders,
            lock,
        }
    }

    /// Whole-system sweep: re-evaluate every pending order against current
    /// stock, oldest request first. Returns the orders that transitioned, for
    /// the notification sink.
    pub async fn verify_availability(&self) -> CoreResult<Vec<Order>> {
        let _guard = self.lock.acquire().await;
        let pending = self.orders.list_by_status(OrderStatus::Pending).await?;
        self.allocate(pending).await
    }

    /// Targeted sweep, invoked when one product's stock changes. Only pending
    /// orders referencing that product are considered; each is still checked
    /// against the stock of *every* product it references.
    pub async fn verify_orders_for_product(&self, product_id: Uuid) -> CoreResult<Vec<Order>> {
        let _guard = self.lock.acquire().await;
        if self.products.get(product_id).await?.is_none() {
            return Ok(Vec::new());
        }
        let pending = self.orders.list_pending_for_product(product_id).await?;
        self.allocate(pending).await
    }

    /// Sets a product's stock to exactly `new_stock` and runs the targeted
    /// sweep for it under one lock acquisition. Returns the product as it
    /// stands after the sweep, plus the newly satisfiable orders.
    pub async fn update_stock(
        &self,
        product_id: Uuid,
        new_stock: i32,
    ) -> CoreResult<(Product, Vec<Order>)> {
        validation::check_stock(new_stock)?;

        let _guard = self.lock.acquire().await;
        self.products
            .set_stock(product_id, new_stock)
            .await?
            .ok_or_else(|| CoreError::not_found("product", product_id))?;
        tracing::info!(product_id = %product_id, stock = new_stock, "stock updated");

        let pending = self.orders.list_pending_for_product(product_id).await?;
        let satisfied = self.allocate(pending).await?;

        let product = self
            .products
            .get(product_id)
            .await?
            .ok_or_else(|| CoreError::not_found("product", product_id))?;
        Ok((product, satisfied))
    }

    /// Greedy FIFO allocation over a batch of pending orders.
    ///
    /// Orders are walked in ascending request date; stock is re-read from the
    /// store for each order, so reservations made earlier in the sweep shrink
    /// the pool seen by later orders. Every order is evaluated independently:
    /// an earlier order that cannot be covered does not block later ones. An
    /// order referencing a product that no longer exists is skipped, not
    /// failed. Caller must hold the allocation lock.
    async fn allocate(&self, mut pending: Vec<Order>) -> CoreResult<Vec<Order>> {
        pending.sort_by_key(|order| order.requested_at);

        let mut transitioned = Vec::new();
        'orders: for order in pending {
            let required = order.required_quantities();

            let mut reserved: HashMap<Uuid, i32> = HashMap::with_capacity(required.len());
            for (&product_id, &needed) in &required {
                match self.products.get(product_id).await? {
                    Some(product) if product.stock >= needed => {
                        reserved.insert(product_id, product.stock - needed);
                    }
                    // Short on stock, or the product is gone: not yet
                    // satisfiable. Move on without touching anything.
                    _ => continue 'orders,
                }
            }

            for (&product_id, &remaining) in &reserved {
                self.products.set_stock(product_id, remaining).await?;
            }
            if let Some(updated) = self
                .orders
                .set_status(order.id, OrderStatus::Available)
                .await?
            {
                tracing::info!(order_id = %updated.id, "order became available");
                transitioned.push(updated);
            }
        }
        Ok(transitioned)
    }
}
