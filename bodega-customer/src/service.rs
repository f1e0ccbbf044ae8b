use crate::customer::{Customer, CustomerPatch, NewCustomer};
use crate::repository::CustomerRepository;
use bodega_core::{CoreError, CoreResult};
use std::sync::Arc;
use uuid::Uuid;

pub struct CustomerService {
    customers: Arc<dyn CustomerRepository>,
}

impl CustomerService {
    pub fn new(customers: Arc<dyn CustomerRepository>) -> Self {
        Self { customers }
    }

    pub async fn create(&self, fields: NewCustomer) -> CoreResult<Customer> {
        let customer = Customer::new(fields);
        customer.validate()?;
        self.customers.create(&customer).await?;
        tracing::info!(customer_id = %customer.id, "customer registered");
        Ok(customer)
    }

    pub async fn get(&self, id: Uuid) -> CoreResult<Customer> {
        self.customers
            .get(id)
            .await?
            .ok_or_else(|| CoreError::not_found("customer", id))
    }

    pub async fn list(&self) -> CoreResult<Vec<Customer>> {
        self.customers.list().await
    }

    pub async fn update(&self, id: Uuid, patch: CustomerPatch) -> CoreResult<Customer> {
        let mut customer = self.get(id).await?;
        customer.apply(patch);
        customer.validate()?;
        self.customers
            .update(&customer)
            .await?
            .ok_or_else(|| CoreError::not_found("customer", id))
    }

    pub async fn delete(&self, id: Uuid) -> CoreResult<()> {
        if self.customers.delete(id).await? {
            Ok(())
        } else {
            Err(CoreError::not_found("customer", id))
        }
    }
}
