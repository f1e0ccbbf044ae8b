use bodega_core::{validation, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer record. Independent lifecycle, no coupling to reconciliation;
/// orders hold a weak reference to the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Customer {
    pub fn new(fields: NewCustomer) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            phone: fields.phone,
            email: fields.email,
            registered_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: CustomerPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> CoreResult<()> {
        validation::check_name(&self.name)?;
        validation::check_phone(&self.phone)?;
        validation::check_email(&self.email)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_validation() {
        let mut customer = Customer::new(NewCustomer {
            name: "Ana Pérez".to_string(),
            phone: "+34 600 111 222".to_string(),
            email: "ana@example.com".to_string(),
        });
        assert!(customer.validate().is_ok());

        customer.apply(CustomerPatch {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        });
        assert!(customer.validate().is_err());
    }
}
