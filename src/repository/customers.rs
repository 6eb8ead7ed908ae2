use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    entity::customers::{
        ActiveModel as CustomerActive, Column as CustomerCol, Entity as Customers,
        Model as CustomerModel,
    },
    error::AppResult,
    models::Customer,
    transactor::{Session, Transactor},
};

#[derive(Clone)]
pub struct CustomerRepository {
    transactor: Transactor,
}

impl CustomerRepository {
    pub fn new(transactor: Transactor) -> Self {
        Self { transactor }
    }

    pub async fn create(
        &self,
        session: &Session,
        phone: &str,
        name: Option<String>,
    ) -> AppResult<Customer> {
        let conn = self.transactor.conn(session)?;
        let model = CustomerActive {
            id: Set(Uuid::new_v4()),
            phone: Set(phone.to_string()),
            name: Set(name),
            created_at: Set(Utc::now().into()),
        }
        .insert(&conn)
        .await?;
        Ok(customer_from_entity(model))
    }

    pub async fn get_by_phone(
        &self,
        session: &Session,
        phone: &str,
    ) -> AppResult<Option<Customer>> {
        let conn = self.transactor.conn(session)?;
        let customer = Customers::find()
            .filter(CustomerCol::Phone.eq(phone))
            .one(&conn)
            .await?
            .map(customer_from_entity);
        Ok(customer)
    }
}

fn customer_from_entity(model: CustomerModel) -> Customer {
    Customer {
        id: model.id,
        phone: model.phone,
        name: model.name,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
