use crate::product::{NewProduct, Product, ProductPatch};
use crate::repository::ProductRepository;
use bodega_core::{CoreError, CoreResult};
use std::sync::Arc;
use uuid::Uuid;

/// Product CRUD with input-boundary validation.
///
/// Plain stock updates go through `ReconciliationEngine::update_stock` in
/// `bodega-order`, because setting stock must trigger the targeted sweep for
/// that product.
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
}

impl CatalogService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    pub async fn create(&self, fields: NewProduct) -> CoreResult<Product> {
        let product = Product::new(fields);
        product.validate()?;
        self.products.create(&product).await?;
        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    pub async fn get(&self, id: Uuid) -> CoreResult<Product> {
        self.products
            .get(id)
            .await?
            .ok_or_else(|| CoreError::not_found("product", id))
    }

    pub async fn list(&self) -> CoreResult<Vec<Product>> {
        self.products.list().await
    }

    pub async fn update(&self, id: Uuid, patch: ProductPatch) -> CoreResult<Product> {
        let mut product = self.get(id).await?;
        product.apply(patch);
        product.validate()?;
        self.products
            .update(&product)
            .await?
            .ok_or_else(|| CoreError::not_found("product", id))
    }

    pub async fn delete(&self, id: Uuid) -> CoreResult<()> {
        if self.products.delete(id).await? {
            tracing::info!(product_id = %id, "product deleted");
            Ok(())
        } else {
            Err(CoreError::not_found("product", id))
        }
    }
}
