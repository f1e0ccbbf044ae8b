pub mod customer;
pub mod repository;
pub mod service;

pub use customer::{Customer, CustomerPatch, NewCustomer};
pub use repository::CustomerRepository;
pub use service::CustomerService;
