#![allow(dead_code)]

use food_order_api::{
    db::{create_orm_conn, run_migrations},
    metrics::HttpMetrics,
    models::{Category, MenuItem, OrderLine},
    state::AppState,
};
use uuid::Uuid;

/// Fresh in-memory database with the schema applied. A single connection
/// keeps every query on the same in-memory database.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let orm = create_orm_conn("sqlite::memory:", 1).await?;
    run_migrations(&orm).await?;
    Ok(AppState::new(orm, HttpMetrics::new()?))
}

pub async fn create_customer(state: &AppState, phone: &str) -> anyhow::Result<Uuid> {
    let customer = state.users.register_user(phone, Some("Test Customer".into())).await?;
    Ok(customer.id)
}

pub async fn create_category(state: &AppState, name: &str) -> anyhow::Result<Category> {
    Ok(state.menu.create_category(name.into(), 0).await?)
}

pub async fn create_menu_item(
    state: &AppState,
    category_id: Uuid,
    name: &str,
    price: f64,
) -> anyhow::Result<MenuItem> {
    let item = MenuItem {
        id: Uuid::nil(),
        category_id,
        name: name.into(),
        description: None,
        price,
        active: true,
        image_url: None,
    };
    Ok(state.menu.create_menu_item(item).await?)
}

pub fn line(menu_item_id: Uuid, quantity: i32) -> OrderLine {
    OrderLine {
        menu_item_id,
        quantity,
    }
}
