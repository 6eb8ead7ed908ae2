use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{Order, OrderAuditEntry, OrderLine, OrderStatus},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    pub menu_item_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub items: Vec<OrderLineRequest>,
    #[serde(default)]
    pub pick_up: bool,
}

impl CreateOrderRequest {
    /// Wire-level checks; returns the lines in request order.
    pub fn validate(&self) -> Result<Vec<OrderLine>, AppError> {
        if self.items.is_empty() {
            return Err(AppError::BadRequest("order must contain at least one item".into()));
        }

        let mut seen = HashSet::with_capacity(self.items.len());
        let mut lines = Vec::with_capacity(self.items.len());
        for item in &self.items {
            if item.quantity <= 0 {
                return Err(AppError::BadRequest(format!(
                    "quantity for menu item {} must be positive",
                    item.menu_item_id
                )));
            }
            if !seen.insert(item.menu_item_id) {
                return Err(AppError::BadRequest(format!(
                    "menu item {} appears more than once",
                    item.menu_item_id
                )));
            }
            lines.push(OrderLine {
                menu_item_id: item.menu_item_id,
                quantity: item.quantity,
            });
        }
        Ok(lines)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

impl UpdateOrderStatusRequest {
    pub fn validate(&self) -> Result<OrderStatus, AppError> {
        let status: OrderStatus = self.status.parse().map_err(AppError::BadRequest)?;
        if status == OrderStatus::Unspecified {
            return Err(AppError::BadRequest("status must be specified".into()));
        }
        Ok(status)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CancelOrderRequest {
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderHistory {
    pub order_id: Uuid,
    pub entries: Vec<OrderAuditEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(menu_item_id: Uuid, quantity: i32) -> OrderLineRequest {
        OrderLineRequest {
            menu_item_id,
            quantity,
        }
    }

    fn request(items: Vec<OrderLineRequest>) -> CreateOrderRequest {
        CreateOrderRequest {
            user_id: Uuid::new_v4(),
            restaurant_id: Uuid::new_v4(),
            items,
            pick_up: false,
        }
    }

    #[test]
    fn rejects_empty_zero_quantity_and_duplicate_lines() {
        let id = Uuid::new_v4();
        assert!(request(vec![]).validate().is_err());
        assert!(request(vec![line(id, 0)]).validate().is_err());
        assert!(request(vec![line(id, 1), line(id, 2)]).validate().is_err());
    }

    #[test]
    fn keeps_request_order() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let lines = request(vec![line(a, 2), line(b, 1)]).validate().expect("valid");
        assert_eq!(lines[0].menu_item_id, a);
        assert_eq!(lines[1].quantity, 1);
    }

    #[test]
    fn status_update_rejects_unknown_and_unspecified() {
        let parse = |s: &str| UpdateOrderStatusRequest { status: s.into() }.validate();
        assert_eq!(parse("paid").ok(), Some(OrderStatus::Paid));
        assert!(parse("shipped").is_err());
        assert!(parse("unspecified").is_err());
    }
}
