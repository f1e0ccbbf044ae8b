use crate::models::{
    LineItemDetails, NewOrder, Order, OrderDetails, OrderPatch, OrderStatus,
};
use crate::reconcile::AllocationLock;
use crate::repository::OrderRepository;
use bodega_catalog::ProductRepository;
use bodega_core::{validation, CoreError, CoreResult};
use bodega_customer::CustomerRepository;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Order lifecycle operations over the injected stores.
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductRepository>,
    customers: Arc<dyn CustomerRepository>,
    lock: AllocationLock,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        products: Arc<dyn ProductRepository>,
        customers: Arc<dyn CustomerRepository>,
        lock: AllocationLock,
    ) -> Self {
        Self {
            orders,
            products,
            customers,
            lock,
        }
    }

    /// Creates an order, deciding its initial state against current stock.
    ///
    /// The order starts `Available` only when every line item (aggregated per
    /// product) is covered at once, in which case stock is decremented
    /// immediately, an irrevocable reservation at creation time. Any
    /// shortfall, or a missing product, makes it `Pending` with stock
    /// untouched.
    pub async fn create_order(&self, fields: NewOrder) -> CoreResult<Order> {
        if fields.items.is_empty() {
            return Err(CoreError::Validation(
                "an order needs at least one line item".into(),
            ));
        }
        for item in &fields.items {
            validation::check_quantity(item.quantity)?;
        }

        let requested_at = fields.requested_at.unwrap_or_else(Utc::now);
        let mut order = Order::new(fields.customer_id, fields.items, requested_at);

        let _guard = self.lock.acquire().await;

        let required = order.required_quantities();
        let mut reserved = Vec::with_capacity(required.len());
        let mut covered = true;
        for (&product_id, &needed) in &required {
            match self.products.get(product_id).await? {
                Some(product) if product.stock >= needed => {
                    reserved.push((product_id, product.stock - needed));
                }
                _ => {
                    covered = false;
                    break;
                }
            }
        }

        if covered {
            for (product_id, remaining) in reserved {
                self.products.set_stock(product_id, remaining).await?;
            }
            order.update_status(OrderStatus::Available);
        }

        self.orders.create(&order).await?;
        tracing::info!(order_id = %order.id, status = order.status.as_str(), "order created");
        Ok(order)
    }

    pub async fn get(&self, id: Uuid) -> CoreResult<Order> {
        self.orders
            .get(id)
            .await?
            .ok_or_else(|| CoreError::not_found("order", id))
    }

    pub async fn list(&self) -> CoreResult<Vec<Order>> {
        self.orders.list().await
    }

    pub async fn list_by_status(&self, status: OrderStatus) -> CoreResult<Vec<Order>> {
        self.orders.list_by_status(status).await
    }

    /// Field update without stock side effects. Status set through here is a
    /// raw overwrite; the delivery contract only applies to `set_status`.
    pub async fn update_order(&self, id: Uuid, patch: OrderPatch) -> CoreResult<Order> {
        let mut order = self.get(id).await?;
        if let Some(items) = &patch.items {
            if items.is_empty() {
                return Err(CoreError::Validation(
                    "an order needs at least one line item".into(),
                ));
            }
            for item in items {
                validation::check_quantity(item.quantity)?;
            }
        }
        if let Some(customer_id) = patch.customer_id {
            order.customer_id = customer_id;
        }
        if let Some(items) = patch.items {
            order.items = items;
        }
        if let Some(status) = patch.status {
            order.status = status;
        }
        order.updated_at = Utc::now();
        self.orders
            .update(&order)
            .await?
            .ok_or_else(|| CoreError::not_found("order", id))
    }

    /// State transition entry point. `Delivered` routes through the delivery
    /// contract; everything else is an overwrite with no stock effect.
    pub async fn set_status(&self, id: Uuid, status: OrderStatus) -> CoreResult<Order> {
        if status == OrderStatus::Delivered {
            return self.deliver(id).await;
        }
        self.orders
            .set_status(id, status)
            .await?
            .ok_or_else(|| CoreError::not_found("order", id))
    }

    /// Marks an order delivered.
    ///
    /// A `Pending` order being force-delivered decrements stock per line item,
    /// floored at zero; the shortfall is absorbed, not reported. An
    /// `Available` order already reserved its stock, and a re-delivered order
    /// never decrements twice.
    pub async fn deliver(&self, id: Uuid) -> CoreResult<Order> {
        let _guard = self.lock.acquire().await;

        let order = self
            .orders
            .get(id)
            .await?
            .ok_or_else(|| CoreError::not_found("order", id))?;

        if order.status == OrderStatus::Pending {
            for (&product_id, &needed) in &order.required_quantities() {
                if let Some(product) = self.products.get(product_id).await? {
                    let remaining = (product.stock - needed).max(0);
                    self.products.set_stock(product_id, remaining).await?;
                }
            }
        }

        let delivered = self
            .orders
            .set_status(id, OrderStatus::Delivered)
            .await?
            .ok_or_else(|| CoreError::not_found("order", id))?;
        tracing::info!(order_id = %id, "order delivered");
        Ok(delivered)
    }

    pub async fn delete(&self, id: Uuid) -> CoreResult<()> {
        if self.orders.delete(id).await? {
            Ok(())
        } else {
            Err(CoreError::not_found("order", id))
        }
    }

    pub async fn order_details(&self, id: Uuid) -> CoreResult<OrderDetails> {
        let order = self.get(id).await?;
        self.join_details(order).await
    }

    pub async fn list_details(&self) -> CoreResult<Vec<OrderDetails>> {
        let orders = self.orders.list().await?;
        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            details.push(self.join_details(order).await?);
        }
        Ok(details)
    }

    pub async fn list_details_by_status(
        &self,
        status: OrderStatus,
    ) -> CoreResult<Vec<OrderDetails>> {
        let orders = self.orders.list_by_status(status).await?;
        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            details.push(self.join_details(order).await?);
        }
        Ok(details)
    }

    /// Resolves the weak references. A deleted customer or product shows up
    /// as `None`; the order itself is always returned.
    async fn join_details(&self, order: Order) -> CoreResult<OrderDetails> {
        let customer = self.customers.get(order.customer_id).await?;
        let mut items = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let product = self.products.get(item.product_id).await?;
            items.push(LineItemDetails {
                product_id: item.product_id,
                quantity: item.quantity,
                product,
            });
        }
        Ok(OrderDetails {
            id: order.id,
            customer_id: order.customer_id,
            customer,
            items,
            requested_at: order.requested_at,
            status: order.status,
            updated_at: order.updated_at,
        })
    }
}
