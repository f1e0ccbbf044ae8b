//! Postgres repositories over sqlx.
//!
//! Queries are runtime-bound so the workspace builds without a live
//! `DATABASE_URL`; the schema lives in `migrations/` at the workspace root.

use async_trait::async_trait;
use bodega_catalog::{Product, ProductRepository};
use bodega_core::{CoreError, CoreResult};
use bodega_customer::{Customer, CustomerRepository};
use bodega_order::{LineItem, Order, OrderRepository, OrderStatus};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

fn pg_err(e: sqlx::Error) -> CoreError {
    CoreError::Persistence(e.to_string())
}

// ============================================================================
// Products
// ============================================================================

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    price_cents: i32,
    stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, description, price_cents, stock, created_at, updated_at";

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create(&self, product: &Product) -> CoreResult<Uuid> {
        sqlx::query(
            "INSERT INTO products (id, name, description, price_cents, stock, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(pg_err)?;
        Ok(product.id)
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(pg_err)?;
        Ok(row.map(Product::from))
    }

    async fn list(&self) -> CoreResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {} FROM products ORDER BY created_at",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(pg_err)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn update(&self, product: &Product) -> CoreResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "UPDATE products
             SET name = $2, description = $3, price_cents = $4, stock = $5, updated_at = $6
             WHERE id = $1
             RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(pg_err)?;
        Ok(row.map(Product::from))
    }

    async fn set_stock(&self, id: Uuid, stock: i32) -> CoreResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "UPDATE products SET stock = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .bind(stock)
        .fetch_optional(&self.pool)
        .await
        .map_err(pg_err)?;
        Ok(row.map(Product::from))
    }

    async fn delete(&self, id: Uuid) -> CoreResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(pg_err)?;
        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Customers
// ============================================================================

pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    phone: String,
    email: String,
    registered_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            registered_at: row.registered_at,
            updated_at: row.updated_at,
        }
    }
}

const CUSTOMER_COLUMNS: &str = "id, name, phone, email, registered_at, updated_at";

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn create(&self, customer: &Customer) -> CoreResult<Uuid> {
        sqlx::query(
            "INSERT INTO customers (id, name, phone, email, registered_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(customer.registered_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await
        .map_err(pg_err)?;
        Ok(customer.id)
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<Customer>> {
        let row: Option<CustomerRow> = sqlx::query_as(&format!(
            "SELECT {} FROM customers WHERE id = $1",
            CUSTOMER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(pg_err)?;
        Ok(row.map(Customer::from))
    }

    async fn list(&self) -> CoreResult<Vec<Customer>> {
        let rows: Vec<CustomerRow> = sqlx::query_as(&format!(
            "SELECT {} FROM customers ORDER BY registered_at",
            CUSTOMER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(pg_err)?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn update(&self, customer: &Customer) -> CoreResult<Option<Customer>> {
        let row: Option<CustomerRow> = sqlx::query_as(&format!(
            "UPDATE customers
             SET name = $2, phone = $3, email = $4, updated_at = $5
             WHERE id = $1
             RETURNING {}",
            CUSTOMER_COLUMNS
        ))
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(customer.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(pg_err)?;
        Ok(row.map(Customer::from))
    }

    async fn delete(&self, id: Uuid) -> CoreResult<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(pg_err)?;
        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Orders
// ============================================================================

pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_items(&self, order_id: Uuid) -> CoreResult<Vec<LineItem>> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            "SELECT product_id, quantity FROM order_items WHERE order_id = $1 ORDER BY position",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(pg_err)?;
        Ok(rows
            .into_iter()
            .map(|row| LineItem {
                product_id: row.product_id,
                quantity: row.quantity,
            })
            .collect())
    }

    async fn hydrate(&self, row: OrderRow) -> CoreResult<Order> {
        let items = self.load_items(row.id).await?;
        row.into_order(items)
    }

    async fn hydrate_all(&self, rows: Vec<OrderRow>) -> CoreResult<Vec<Order>> {
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            orders.push(self.hydrate(row).await?);
        }
        Ok(orders)
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    customer_id: Uuid,
    requested_at: DateTime<Utc>,
    status: String,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<LineItem>) -> CoreResult<Order> {
        let status: OrderStatus = self
            .status
            .parse()
            .map_err(|_| CoreError::Persistence(format!("corrupt order status: {}", self.status)))?;
        Ok(Order {
            id: self.id,
            customer_id: self.customer_id,
            items,
            requested_at: self.requested_at,
            status,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    product_id: Uuid,
    quantity: i32,
}

const ORDER_COLUMNS: &str = "id, customer_id, requested_at, status, updated_at";

async fn insert_items(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: Uuid,
    items: &[LineItem],
) -> Result<(), sqlx::Error> {
    for (position, item) in items.iter().enumerate() {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, product_id, quantity, position)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(position as i32)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(&self, order: &Order) -> CoreResult<Uuid> {
        let mut tx = self.pool.begin().await.map_err(pg_err)?;

        sqlx::query(
            "INSERT INTO orders (id, customer_id, requested_at, status, updated_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(order.id)
        .bind(order.customer_id)
        .bind(order.requested_at)
        .bind(order.status.as_str())
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(pg_err)?;

        insert_items(&mut tx, order.id, &order.items)
            .await
            .map_err(pg_err)?;

        tx.commit().await.map_err(pg_err)?;
        Ok(order.id)
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(pg_err)?;
        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> CoreResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {} FROM orders ORDER BY requested_at",
            ORDER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(pg_err)?;
        self.hydrate_all(rows).await
    }

    async fn list_by_status(&self, status: OrderStatus) -> CoreResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {} FROM orders WHERE status = $1 ORDER BY requested_at",
            ORDER_COLUMNS
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(pg_err)?;
        self.hydrate_all(rows).await
    }

    async fn list_pending_for_product(&self, product_id: Uuid) -> CoreResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            "SELECT DISTINCT o.id, o.customer_id, o.requested_at, o.status, o.updated_at
             FROM orders o
             JOIN order_items i ON i.order_id = o.id
             WHERE o.status = $1 AND i.product_id = $2
             ORDER BY o.requested_at",
        )
        .bind(OrderStatus::Pending.as_str())
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(pg_err)?;
        self.hydrate_all(rows).await
    }

    async fn update(&self, order: &Order) -> CoreResult<Option<Order>> {
        let mut tx = self.pool.begin().await.map_err(pg_err)?;

        let result = sqlx::query(
            "UPDATE orders SET customer_id = $2, status = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(order.id)
        .bind(order.customer_id)
        .bind(order.status.as_str())
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(pg_err)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        // Line items are replaced wholesale; the order owns the sequence.
        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(order.id)
            .execute(&mut *tx)
            .await
            .map_err(pg_err)?;
        insert_items(&mut tx, order.id, &order.items)
            .await
            .map_err(pg_err)?;

        tx.commit().await.map_err(pg_err)?;
        self.get(order.id).await
    }

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> CoreResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(pg_err)?;
        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> CoreResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(pg_err)?;
        Ok(result.rows_affected() > 0)
    }
}
