use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{Category, MenuItem},
    services::order_service::price_to_minor_units,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MenuItemRequest {
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    #[serde(default = "default_active")]
    pub active: bool,
    pub image_url: Option<String>,
}

fn default_active() -> bool {
    true
}

impl MenuItemRequest {
    pub fn into_menu_item(self, id: Uuid) -> Result<MenuItem, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
        // Orders store prices in minor units; a price that cannot be
        // converted could never be ordered.
        if price_to_minor_units(self.price).is_none() {
            return Err(AppError::BadRequest(
                "price must be a non-negative amount within range".into(),
            ));
        }
        Ok(MenuItem {
            id,
            category_id: self.category_id,
            name: self.name,
            description: self.description,
            price: self.price,
            active: self.active,
            image_url: self.image_url,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuByCategory {
    pub category: Category,
    pub items: Vec<MenuItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(price: f64) -> MenuItemRequest {
        MenuItemRequest {
            category_id: Uuid::new_v4(),
            name: "Pizza".into(),
            description: None,
            price,
            active: true,
            image_url: None,
        }
    }

    #[test]
    fn orderable_prices_are_accepted() {
        let item = request(9.5).into_menu_item(Uuid::nil()).expect("valid");
        assert_eq!(item.price, 9.5);
        assert!(request(0.0).into_menu_item(Uuid::nil()).is_ok());
    }

    #[test]
    fn prices_without_minor_unit_form_are_rejected() {
        for price in [-0.01, f64::NAN, f64::INFINITY, 1e17] {
            let err = request(price).into_menu_item(Uuid::nil()).expect_err("invalid price");
            assert!(matches!(err, AppError::BadRequest(_)), "price {price}");
        }
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut req = request(1.0);
        req.name = "  ".into();
        assert!(req.into_menu_item(Uuid::nil()).is_err());
    }
}
