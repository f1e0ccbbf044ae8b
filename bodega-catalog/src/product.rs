use bodega_core::{validation, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog entry with a mutable stock count.
///
/// Stock is mutated by explicit stock updates and by the reconciliation engine
/// when an order is satisfied; it is never allowed to go negative through
/// either path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price_cents: i32,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a product; the store assigns the id.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price_cents: i32,
    pub stock: i32,
}

/// Partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i32>,
    pub stock: Option<i32>,
}

impl Product {
    pub fn new(fields: NewProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            description: fields.description,
            price_cents: fields.price_cents,
            stock: fields.stock,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price_cents) = patch.price_cents {
            self.price_cents = price_cents;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> CoreResult<()> {
        validation::check_name(&self.name)?;
        validation::check_description(&self.description)?;
        validation::check_price(self.price_cents)?;
        validation::check_stock(self.stock)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewProduct {
        NewProduct {
            name: "Ceramic mug".to_string(),
            description: "Stoneware, 350ml".to_string(),
            price_cents: 1250,
            stock: 8,
        }
    }

    #[test]
    fn test_new_product_validates() {
        let product = Product::new(sample());
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_negative_stock_fails_validation() {
        let mut product = Product::new(sample());
        product.stock = -3;
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_patch_applies_only_set_fields() {
        let mut product = Product::new(sample());
        let before = product.price_cents;
        product.apply(ProductPatch {
            stock: Some(20),
            ..Default::default()
        });
        assert_eq!(product.stock, 20);
        assert_eq!(product.price_cents, before);
    }
}
