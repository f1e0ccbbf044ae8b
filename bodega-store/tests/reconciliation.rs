//! Behavioral suite for stock allocation and order-state reconciliation,
//! run against the in-memory store.

use bodega_catalog::{CatalogService, NewProduct, Product, ProductRepository};
use bodega_core::CoreError;
use bodega_customer::{CustomerRepository, CustomerService, NewCustomer};
use bodega_order::{
    AllocationLock, LineItem, NewOrder, Order, OrderRepository, OrderService, OrderStatus,
    ReconciliationEngine,
};
use bodega_store::{MemoryCustomerRepository, MemoryOrderRepository, MemoryProductRepository};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

struct Harness {
    products: Arc<dyn ProductRepository>,
    catalog: CatalogService,
    customers: CustomerService,
    orders: OrderService,
    engine: ReconciliationEngine,
}

fn harness() -> Harness {
    let products: Arc<dyn ProductRepository> = Arc::new(MemoryProductRepository::new());
    let customers: Arc<dyn CustomerRepository> = Arc::new(MemoryCustomerRepository::new());
    let orders: Arc<dyn OrderRepository> = Arc::new(MemoryOrderRepository::new());
    let lock = AllocationLock::new();

    Harness {
        products: products.clone(),
        catalog: CatalogService::new(products.clone()),
        customers: CustomerService::new(customers.clone()),
        orders: OrderService::new(
            orders.clone(),
            products.clone(),
            customers.clone(),
            lock.clone(),
        ),
        engine: ReconciliationEngine::new(products, orders, lock),
    }
}

impl Harness {
    async fn product(&self, name: &str, stock: i32) -> Product {
        self.catalog
            .create(NewProduct {
                name: name.to_string(),
                description: String::new(),
                price_cents: 500,
                stock,
            })
            .await
            .unwrap()
    }

    async fn customer(&self, name: &str) -> Uuid {
        self.customers
            .create(NewCustomer {
                name: name.to_string(),
                phone: "600111222".to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
            })
            .await
            .unwrap()
            .id
    }

    /// Creates an order backdated by `age_minutes` so FIFO ordering in tests
    /// is explicit.
    async fn order(&self, customer_id: Uuid, items: Vec<LineItem>, age_minutes: i64) -> Order {
        self.orders
            .create_order(NewOrder {
                customer_id,
                items,
                requested_at: Some(Utc::now() - Duration::minutes(age_minutes)),
            })
            .await
            .unwrap()
    }

    async fn stock_of(&self, product_id: Uuid) -> i32 {
        self.products.get(product_id).await.unwrap().unwrap().stock
    }

    async fn status_of(&self, order_id: Uuid) -> OrderStatus {
        self.orders.get(order_id).await.unwrap().status
    }
}

fn item(product_id: Uuid, quantity: i32) -> LineItem {
    LineItem {
        product_id,
        quantity,
    }
}

#[tokio::test]
async fn test_covered_order_is_available_and_reserves_stock_once() {
    let h = harness();
    let customer = h.customer("Ana").await;
    let flour = h.product("Flour", 10).await;
    let sugar = h.product("Sugar", 3).await;

    let order = h
        .order(customer, vec![item(flour.id, 4), item(sugar.id, 3)], 0)
        .await;

    assert_eq!(order.status, OrderStatus::Available);
    assert_eq!(h.stock_of(flour.id).await, 6);
    assert_eq!(h.stock_of(sugar.id).await, 0);
}

#[tokio::test]
async fn test_short_order_is_pending_and_leaves_stock_untouched() {
    let h = harness();
    let customer = h.customer("Ana").await;
    let flour = h.product("Flour", 10).await;
    let sugar = h.product("Sugar", 1).await;

    let order = h
        .order(customer, vec![item(flour.id, 4), item(sugar.id, 3)], 0)
        .await;

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(h.stock_of(flour.id).await, 10);
    assert_eq!(h.stock_of(sugar.id).await, 1);
}

#[tokio::test]
async fn test_same_product_line_items_must_be_simultaneously_coverable() {
    let h = harness();
    let customer = h.customer("Ana").await;
    let flour = h.product("Flour", 4).await;

    // 3 + 3 against stock 4: each item alone fits, together they do not.
    let order = h
        .order(customer, vec![item(flour.id, 3), item(flour.id, 3)], 0)
        .await;

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(h.stock_of(flour.id).await, 4);
}

#[tokio::test]
async fn test_order_for_unknown_product_is_pending() {
    let h = harness();
    let customer = h.customer("Ana").await;

    let order = h.order(customer, vec![item(Uuid::new_v4(), 1)], 0).await;
    assert_eq!(order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_targeted_sweep_allocates_fifo_prefix() {
    let h = harness();
    let customer = h.customer("Ana").await;
    let flour = h.product("Flour", 0).await;

    let oldest = h.order(customer, vec![item(flour.id, 2)], 30).await;
    let middle = h.order(customer, vec![item(flour.id, 1)], 20).await;
    let newest = h.order(customer, vec![item(flour.id, 3)], 10).await;

    let (product, satisfied) = h.engine.update_stock(flour.id, 3).await.unwrap();

    // 2 to the oldest, 1 to the middle, nothing left for the newest.
    let ids: Vec<Uuid> = satisfied.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![oldest.id, middle.id]);
    assert_eq!(h.status_of(oldest.id).await, OrderStatus::Available);
    assert_eq!(h.status_of(middle.id).await, OrderStatus::Available);
    assert_eq!(h.status_of(newest.id).await, OrderStatus::Pending);
    assert_eq!(product.stock, 0);
}

#[tokio::test]
async fn test_unsatisfiable_older_order_does_not_block_newer_one() {
    // Stock 0; A needs 2 (older), B needs 1 (newer). Raising stock to 1 must
    // leave A pending and satisfy B with the single unit.
    let h = harness();
    let customer = h.customer("Ana").await;
    let flour = h.product("Flour", 0).await;

    let a = h.order(customer, vec![item(flour.id, 2)], 20).await;
    let b = h.order(customer, vec![item(flour.id, 1)], 10).await;

    let (product, satisfied) = h.engine.update_stock(flour.id, 1).await.unwrap();

    assert_eq!(satisfied.len(), 1);
    assert_eq!(satisfied[0].id, b.id);
    assert_eq!(h.status_of(a.id).await, OrderStatus::Pending);
    assert_eq!(h.status_of(b.id).await, OrderStatus::Available);
    assert_eq!(product.stock, 0);
}

#[tokio::test]
async fn test_targeted_sweep_checks_every_line_item_of_an_order() {
    let h = harness();
    let customer = h.customer("Ana").await;
    let flour = h.product("Flour", 0).await;
    let sugar = h.product("Sugar", 0).await;

    let order = h
        .order(customer, vec![item(flour.id, 1), item(sugar.id, 2)], 10)
        .await;

    // Flour alone is not enough: the sugar line is still short.
    let (_, satisfied) = h.engine.update_stock(flour.id, 5).await.unwrap();
    assert!(satisfied.is_empty());
    assert_eq!(h.status_of(order.id).await, OrderStatus::Pending);

    // Once sugar arrives the order is covered; both lines reserve.
    let (_, satisfied) = h.engine.update_stock(sugar.id, 2).await.unwrap();
    assert_eq!(satisfied.len(), 1);
    assert_eq!(h.status_of(order.id).await, OrderStatus::Available);
    assert_eq!(h.stock_of(flour.id).await, 4);
    assert_eq!(h.stock_of(sugar.id).await, 0);
}

#[tokio::test]
async fn test_whole_system_sweep_reserves_and_reports_transitions() {
    let h = harness();
    let customer = h.customer("Ana").await;
    let flour = h.product("Flour", 0).await;
    let sugar = h.product("Sugar", 0).await;

    let first = h.order(customer, vec![item(flour.id, 2)], 20).await;
    let second = h.order(customer, vec![item(sugar.id, 1)], 10).await;

    // Restock through the repository so no targeted sweep runs first.
    h.products.set_stock(flour.id, 2).await.unwrap();
    h.products.set_stock(sugar.id, 4).await.unwrap();

    let satisfied = h.engine.verify_availability().await.unwrap();
    let ids: Vec<Uuid> = satisfied.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert_eq!(h.stock_of(flour.id).await, 0);
    assert_eq!(h.stock_of(sugar.id).await, 3);
}

#[tokio::test]
async fn test_sweep_is_idempotent_without_stock_changes() {
    let h = harness();
    let customer = h.customer("Ana").await;
    let flour = h.product("Flour", 0).await;

    h.order(customer, vec![item(flour.id, 1)], 20).await;
    h.order(customer, vec![item(flour.id, 5)], 10).await;
    h.products.set_stock(flour.id, 1).await.unwrap();

    let first_run = h.engine.verify_availability().await.unwrap();
    assert_eq!(first_run.len(), 1);

    let second_run = h.engine.verify_availability().await.unwrap();
    assert!(second_run.is_empty());
    assert_eq!(h.stock_of(flour.id).await, 0);
}

#[tokio::test]
async fn test_delivering_available_order_does_not_touch_stock() {
    let h = harness();
    let customer = h.customer("Ana").await;
    let flour = h.product("Flour", 5).await;

    let order = h.order(customer, vec![item(flour.id, 2)], 0).await;
    assert_eq!(order.status, OrderStatus::Available);
    assert_eq!(h.stock_of(flour.id).await, 3);

    let delivered = h
        .orders
        .set_status(order.id, OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    // Reserved at creation; delivery must not decrement again.
    assert_eq!(h.stock_of(flour.id).await, 3);
}

#[tokio::test]
async fn test_delivering_pending_order_decrements_floored_at_zero() {
    let h = harness();
    let customer = h.customer("Ana").await;
    let flour = h.product("Flour", 1).await;

    let order = h.order(customer, vec![item(flour.id, 5)], 0).await;
    assert_eq!(order.status, OrderStatus::Pending);

    let delivered = h.orders.deliver(order.id).await.unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert_eq!(h.stock_of(flour.id).await, 0);
}

#[tokio::test]
async fn test_redelivery_never_decrements_twice() {
    let h = harness();
    let customer = h.customer("Ana").await;
    let flour = h.product("Flour", 10).await;

    let order = h.order(customer, vec![item(flour.id, 4)], 0).await;
    assert_eq!(h.stock_of(flour.id).await, 6);

    h.orders.deliver(order.id).await.unwrap();
    h.orders.deliver(order.id).await.unwrap();
    assert_eq!(h.stock_of(flour.id).await, 6);
}

#[tokio::test]
async fn test_sweep_skips_orders_referencing_deleted_products() {
    let h = harness();
    let customer = h.customer("Ana").await;
    let flour = h.product("Flour", 0).await;
    let ghost = h.product("Discontinued", 0).await;

    let dangling = h.order(customer, vec![item(ghost.id, 1)], 20).await;
    let viable = h.order(customer, vec![item(flour.id, 1)], 10).await;

    h.catalog.delete(ghost.id).await.unwrap();
    h.products.set_stock(flour.id, 1).await.unwrap();

    let satisfied = h.engine.verify_availability().await.unwrap();

    // The dangling order can never become available, but it neither errors
    // nor blocks the viable one.
    assert_eq!(satisfied.len(), 1);
    assert_eq!(satisfied[0].id, viable.id);
    assert_eq!(h.status_of(dangling.id).await, OrderStatus::Pending);
}

#[tokio::test]
async fn test_sweep_for_deleted_product_returns_empty() {
    let h = harness();
    let flour = h.product("Flour", 3).await;
    h.catalog.delete(flour.id).await.unwrap();

    let satisfied = h.engine.verify_orders_for_product(flour.id).await.unwrap();
    assert!(satisfied.is_empty());
}

#[tokio::test]
async fn test_missing_customer_is_surfaced_as_none_not_an_error() {
    let h = harness();
    let customer = h.customer("Ana").await;
    let flour = h.product("Flour", 0).await;

    let order = h.order(customer, vec![item(flour.id, 1)], 0).await;
    h.customers.delete(customer).await.unwrap();

    // Still processed for stock purposes.
    let (_, satisfied) = h.engine.update_stock(flour.id, 1).await.unwrap();
    assert_eq!(satisfied.len(), 1);

    let details = h.orders.order_details(order.id).await.unwrap();
    assert!(details.customer.is_none());
    assert_eq!(details.status, OrderStatus::Available);
}

#[tokio::test]
async fn test_update_stock_rejects_negative_values() {
    let h = harness();
    let flour = h.product("Flour", 3).await;

    let err = h.engine.update_stock(flour.id, -1).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    assert_eq!(h.stock_of(flour.id).await, 3);
}

#[tokio::test]
async fn test_update_stock_unknown_product_is_not_found() {
    let h = harness();
    let err = h.engine.update_stock(Uuid::new_v4(), 5).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn test_update_stock_sets_absolute_value_not_delta() {
    let h = harness();
    let flour = h.product("Flour", 7).await;

    let (product, _) = h.engine.update_stock(flour.id, 2).await.unwrap();
    assert_eq!(product.stock, 2);
}

#[tokio::test]
async fn test_stock_never_negative_across_mixed_operations() {
    let h = harness();
    let customer = h.customer("Ana").await;
    let flour = h.product("Flour", 2).await;
    let sugar = h.product("Sugar", 0).await;

    let a = h.order(customer, vec![item(flour.id, 2)], 40).await; // reserves
    let b = h.order(customer, vec![item(flour.id, 3), item(sugar.id, 1)], 30).await;
    h.orders.deliver(b.id).await.unwrap(); // force-delivery absorbs shortfall
    h.engine.update_stock(flour.id, 4).await.unwrap();
    h.engine.update_stock(sugar.id, 1).await.unwrap();
    h.orders.deliver(a.id).await.unwrap();
    h.engine.verify_availability().await.unwrap();

    for product in h.catalog.list().await.unwrap() {
        assert!(
            product.stock >= 0,
            "stock of {} went negative: {}",
            product.name,
            product.stock
        );
    }
}

#[tokio::test]
async fn test_empty_order_is_rejected_at_the_boundary() {
    let h = harness();
    let customer = h.customer("Ana").await;

    let err = h
        .orders
        .create_order(NewOrder {
            customer_id: customer,
            items: vec![],
            requested_at: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn test_non_positive_quantity_is_rejected_at_the_boundary() {
    let h = harness();
    let customer = h.customer("Ana").await;
    let flour = h.product("Flour", 5).await;

    let err = h
        .orders
        .create_order(NewOrder {
            customer_id: customer,
            items: vec![item(flour.id, 0)],
            requested_at: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    assert_eq!(h.stock_of(flour.id).await, 5);
}
