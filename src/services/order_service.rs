use std::sync::Arc;

use uuid::Uuid;

use crate::{
    audit::{self, ORDER_CANCELLED, ORDER_CREATED, ORDER_STATUS_UPDATE},
    error::{AppError, AppResult},
    models::{NewOrder, Order, OrderAuditEntry, OrderItem, OrderLine, OrderStatus},
    repository::{MenuLookup, OrderRepository},
    transactor::{Session, Transactor},
};

/// Order lifecycle orchestration: pricing and atomic creation, reads, and
/// status changes.
#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    menu: Arc<dyn MenuLookup>,
    transactor: Transactor,
}

impl OrderService {
    pub fn new(orders: OrderRepository, menu: Arc<dyn MenuLookup>, transactor: Transactor) -> Self {
        Self {
            orders,
            menu,
            transactor,
        }
    }

    /// Prices every line from the catalog, then writes the order and its
    /// items in one transaction. Prices are looked up before the transaction
    /// opens and are never read again: the order keeps the price at the time
    /// it was placed.
    pub async fn create_order(
        &self,
        user_id: Uuid,
        restaurant_id: Uuid,
        lines: Vec<OrderLine>,
        pick_up: bool,
    ) -> AppResult<Order> {
        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let menu_item = self
                .menu
                .get_menu_item(line.menu_item_id)
                .await?
                .ok_or(AppError::MenuItemNotFound(line.menu_item_id))?;
            let unit_price = price_to_minor_units(menu_item.price).ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "menu item {} has an invalid price {}",
                    menu_item.id,
                    menu_item.price
                ))
            })?;
            items.push(OrderItem {
                menu_item_id: line.menu_item_id,
                quantity: line.quantity,
                unit_price,
            });
        }

        let total_amount = total_amount(&items)
            .ok_or_else(|| AppError::BadRequest("order total is out of range".into()))?;

        let draft = NewOrder {
            user_id,
            restaurant_id,
            status: OrderStatus::AwaitingPayment,
            total_amount,
            items,
            pick_up,
        };

        let orders = &self.orders;
        let transactor = &self.transactor;
        let order = self
            .transactor
            .run_in_transaction(&Session::pooled(), move |session| async move {
                let mut order = orders.create(&session, &draft).await?;
                orders.create_items(&session, order.id, &draft.items).await?;
                audit::log_audit(
                    &transactor.conn(&session)?,
                    order.id,
                    ORDER_CREATED,
                    Some(order.status),
                    None,
                )
                .await?;
                order.items = draft.items;
                Ok(order)
            })
            .await?;

        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            total_amount = order.total_amount,
            items = order.items.len(),
            "order created"
        );
        Ok(order)
    }

    pub async fn get_order(&self, id: Uuid) -> AppResult<Option<Order>> {
        self.orders.get(&Session::pooled(), id).await
    }

    pub async fn list_user_orders(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<Order>> {
        self.orders
            .list_by_user(&Session::pooled(), user_id, limit, offset)
            .await
    }

    pub async fn list_orders_by_status(
        &self,
        statuses: &[OrderStatus],
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<Order>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }
        self.orders
            .list_by_status(&Session::pooled(), statuses, limit, offset)
            .await
    }

    /// Overwrites the status whatever the current one is; there is no
    /// transition table.
    pub async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        self.change_status(id, status, ORDER_STATUS_UPDATE, None).await
    }

    /// A status change to `cancelled`. No payment or inventory side effects;
    /// the reason is kept in the audit trail.
    pub async fn cancel_order(&self, id: Uuid, reason: &str) -> AppResult<Order> {
        let reason = Some(reason.trim()).filter(|r| !r.is_empty());
        self.change_status(id, OrderStatus::Cancelled, ORDER_CANCELLED, reason)
            .await
    }

    pub async fn order_history(&self, id: Uuid) -> AppResult<Vec<OrderAuditEntry>> {
        let session = Session::pooled();
        if self.orders.get(&session, id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        audit::list_for_order(&self.transactor.conn(&session)?, id).await
    }

    async fn change_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        action: &str,
        reason: Option<&str>,
    ) -> AppResult<Order> {
        let orders = &self.orders;
        let transactor = &self.transactor;
        let order = self
            .transactor
            .run_in_transaction(&Session::pooled(), move |session| async move {
                if !orders.update_status(&session, id, status).await? {
                    return Err(AppError::NotFound);
                }
                let conn = transactor.conn(&session)?;
                audit::log_audit(&conn, id, action, Some(status), reason).await?;
                orders.get(&session, id).await?.ok_or(AppError::NotFound)
            })
            .await?;

        tracing::info!(order_id = %id, status = %status, action, "order status changed");
        Ok(order)
    }
}

/// Converts a catalog price in major units to minor units (cents),
/// rounding half away from zero. `None` for negative or non-finite prices
/// and for values beyond `i64`.
pub fn price_to_minor_units(price: f64) -> Option<i64> {
    if !price.is_finite() || price < 0.0 {
        return None;
    }
    let cents = (price * 100.0).round();
    if cents > i64::MAX as f64 {
        return None;
    }
    Some(cents as i64)
}

/// Σ unit_price × quantity, `None` on overflow.
pub fn total_amount(items: &[OrderItem]) -> Option<i64> {
    items.iter().try_fold(0i64, |acc, item| {
        item.unit_price
            .checked_mul(i64::from(item.quantity))
            .and_then(|line| acc.checked_add(line))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(unit_price: i64, quantity: i32) -> OrderItem {
        OrderItem {
            menu_item_id: Uuid::new_v4(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn prices_round_half_away_from_zero() {
        assert_eq!(price_to_minor_units(5.0), Some(500));
        assert_eq!(price_to_minor_units(3.5), Some(350));
        // 0.29 * 100 is 28.999999999999996 in binary floating point.
        assert_eq!(price_to_minor_units(0.29), Some(29));
        assert_eq!(price_to_minor_units(19.99), Some(1999));
        assert_eq!(price_to_minor_units(0.125), Some(13));
        assert_eq!(price_to_minor_units(0.0), Some(0));
    }

    #[test]
    fn invalid_prices_are_rejected() {
        assert_eq!(price_to_minor_units(-1.0), None);
        assert_eq!(price_to_minor_units(f64::NAN), None);
        assert_eq!(price_to_minor_units(f64::INFINITY), None);
        assert_eq!(price_to_minor_units(1e30), None);
    }

    #[test]
    fn total_sums_unit_price_times_quantity() {
        assert_eq!(total_amount(&[item(500, 2), item(350, 1)]), Some(1350));
        assert_eq!(total_amount(&[]), Some(0));
        assert_eq!(total_amount(&[item(i64::MAX, 2)]), None);
    }
}
