pub mod models;
pub mod reconcile;
pub mod repository;
pub mod service;

pub use models::{LineItem, LineItemDetails, NewOrder, Order, OrderDetails, OrderPatch, OrderStatus};
pub use reconcile::{AllocationLock, ReconciliationEngine};
pub use repository::OrderRepository;
pub use service::OrderService;
