use sea_orm::SqlErr;

use crate::{
    error::{AppError, AppResult},
    models::Customer,
    repository::CustomerRepository,
    transactor::Session,
};

#[derive(Clone)]
pub struct UserService {
    customers: CustomerRepository,
}

impl UserService {
    pub fn new(customers: CustomerRepository) -> Self {
        Self { customers }
    }

    /// Returns the customer registered under `phone`, creating it first if needed.
    pub async fn register_user(&self, phone: &str, name: Option<String>) -> AppResult<Customer> {
        let session = Session::pooled();
        if let Some(existing) = self.customers.get_by_phone(&session, phone).await? {
            return Ok(existing);
        }

        match self.customers.create(&session, phone, name).await {
            Ok(customer) => {
                tracing::info!(customer_id = %customer.id, "customer registered");
                Ok(customer)
            }
            // A concurrent registration won the unique phone index.
            Err(AppError::OrmError(err))
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                tracing::debug!(phone, "customer registered concurrently, re-reading");
                self.customers
                    .get_by_phone(&session, phone)
                    .await?
                    .ok_or(AppError::OrmError(err))
            }
            Err(err) => Err(err),
        }
    }
}
