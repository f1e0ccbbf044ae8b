pub mod product;
pub mod repository;
pub mod service;

pub use product::{NewProduct, Product, ProductPatch};
pub use repository::ProductRepository;
pub use service::CatalogService;
