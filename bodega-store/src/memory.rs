//! In-memory repositories.
//!
//! The explicit, injectable version of the mutable-array store this system
//! replaces. Tests substitute these for the Postgres implementations; they
//! also back local development without a database.

use async_trait::async_trait;
use bodega_catalog::{Product, ProductRepository};
use bodega_core::CoreResult;
use bodega_customer::{Customer, CustomerRepository};
use bodega_order::{Order, OrderRepository, OrderStatus};
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryProductRepository {
    products: RwLock<HashMap<Uuid, Product>>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn create(&self, product: &Product) -> CoreResult<Uuid> {
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product.id)
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn list(&self) -> CoreResult<Vec<Product>> {
        let mut products: Vec<Product> = self.products.read().await.values().cloned().collect();
        products.sort_by_key(|p| p.created_at);
        Ok(products)
    }

    async fn update(&self, product: &Product) -> CoreResult<Option<Product>> {
        let mut products = self.products.write().await;
        match products.get_mut(&product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn set_stock(&self, id: Uuid, stock: i32) -> CoreResult<Option<Product>> {
        let mut products = self.products.write().await;
        match products.get_mut(&id) {
            Some(product) => {
                product.stock = stock;
                product.updated_at = Utc::now();
                Ok(Some(product.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> CoreResult<bool> {
        Ok(self.products.write().await.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryCustomerRepository {
    customers: RwLock<HashMap<Uuid, Customer>>,
}

impl MemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRepository for MemoryCustomerRepository {
    async fn create(&self, customer: &Customer) -> CoreResult<Uuid> {
        self.customers
            .write()
            .await
            .insert(customer.id, customer.clone());
        Ok(customer.id)
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<Customer>> {
        Ok(self.customers.read().await.get(&id).cloned())
    }

    async fn list(&self) -> CoreResult<Vec<Customer>> {
        let mut customers: Vec<Customer> =
            self.customers.read().await.values().cloned().collect();
        customers.sort_by_key(|c| c.registered_at);
        Ok(customers)
    }

    async fn update(&self, customer: &Customer) -> CoreResult<Option<Customer>> {
        let mut customers = self.customers.write().await;
        match customers.get_mut(&customer.id) {
            Some(existing) => {
                *existing = customer.clone();
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> CoreResult<bool> {
        Ok(self.customers.write().await.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn create(&self, order: &Order) -> CoreResult<Uuid> {
        self.orders.write().await.insert(order.id, order.clone());
        Ok(order.id)
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn list(&self) -> CoreResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.orders.read().await.values().cloned().collect();
        orders.sort_by_key(|o| o.requested_at);
        Ok(orders)
    }

    async fn list_by_status(&self, status: OrderStatus) -> CoreResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.status == status)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.requested_at);
        Ok(orders)
    }

    async fn list_pending_for_product(&self, product_id: Uuid) -> CoreResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.status == OrderStatus::Pending && o.references_product(product_id))
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.requested_at);
        Ok(orders)
    }

    async fn update(&self, order: &Order) -> CoreResult<Option<Order>> {
        let mut orders = self.orders.write().await;
        match orders.get_mut(&order.id) {
            Some(existing) => {
                *existing = order.clone();
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> CoreResult<Option<Order>> {
        let mut orders = self.orders.write().await;
        match orders.get_mut(&id) {
            Some(order) => {
                order.update_status(status);
                Ok(Some(order.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> CoreResult<bool> {
        Ok(self.orders.write().await.remove(&id).is_some())
    }
}
