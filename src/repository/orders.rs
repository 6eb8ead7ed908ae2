use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
    },
    error::{AppError, AppResult},
    models::{NewOrder, Order, OrderItem, OrderStatus},
    transactor::{Session, Transactor},
};

/// Largest row count the store binds for `LIMIT` / `OFFSET` (a signed 64-bit value).
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Row-level persistence for orders and their line items.
///
/// Every method resolves its connection through the [`Transactor`], so calls
/// made with a transactional [`Session`] join that transaction.
#[derive(Clone)]
pub struct OrderRepository {
    transactor: Transactor,
}

impl OrderRepository {
    pub fn new(transactor: Transactor) -> Self {
        Self { transactor }
    }

    /// Inserts the order row. Id and timestamps are assigned here; the
    /// returned aggregate has no items yet.
    pub async fn create(&self, session: &Session, order: &NewOrder) -> AppResult<Order> {
        let conn = self.transactor.conn(session)?;
        let now = Utc::now();

        let model = OrderActive {
            id: Set(Uuid::new_v4()),
            customer_id: Set(order.user_id),
            restaurant_id: Set(order.restaurant_id),
            status: Set(order.status),
            total_amount: Set(order.total_amount),
            pick_up: Set(order.pick_up),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&conn)
        .await?;

        Ok(order_from_entity(model, Vec::new()))
    }

    /// Inserts one row per item, stopping at the first failure. Atomicity
    /// across rows comes from the enclosing transaction, not from this call.
    pub async fn create_items(
        &self,
        session: &Session,
        order_id: Uuid,
        items: &[OrderItem],
    ) -> AppResult<()> {
        let conn = self.transactor.conn(session)?;

        for (line_no, item) in items.iter().enumerate() {
            let line_no = i32::try_from(line_no)
                .map_err(|_| AppError::BadRequest("too many order items".into()))?;
            OrderItems::insert(OrderItemActive {
                order_id: Set(order_id),
                menu_item_id: Set(item.menu_item_id),
                line_no: Set(line_no),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
            })
            .exec_without_returning(&conn)
            .await?;
        }

        Ok(())
    }

    /// Fetches an order with its items. `None` when absent.
    pub async fn get(&self, session: &Session, id: Uuid) -> AppResult<Option<Order>> {
        let conn = self.transactor.conn(session)?;

        let Some(model) = Orders::find_by_id(id).one(&conn).await? else {
            return Ok(None);
        };

        let items = OrderItems::find()
            .filter(OrderItemCol::OrderId.eq(id))
            .order_by_asc(OrderItemCol::LineNo)
            .all(&conn)
            .await?
            .into_iter()
            .map(order_item_from_entity)
            .collect();

        Ok(Some(order_from_entity(model, items)))
    }

    /// Overwrites status and modification time. Returns `false` when no
    /// order has this id.
    pub async fn update_status(
        &self,
        session: &Session,
        id: Uuid,
        status: OrderStatus,
    ) -> AppResult<bool> {
        let conn = self.transactor.conn(session)?;

        let result = Orders::update_many()
            .col_expr(OrderCol::Status, Expr::value(status))
            .col_expr(
                OrderCol::UpdatedAt,
                Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(Utc::now())),
            )
            .filter(OrderCol::Id.eq(id))
            .exec(&conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_by_user(
        &self,
        session: &Session,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<Order>> {
        let conn = self.transactor.conn(session)?;

        let models = Orders::find()
            .filter(OrderCol::CustomerId.eq(user_id))
            .order_by_desc(OrderCol::CreatedAt)
            .order_by_desc(OrderCol::Id)
            .limit(limit.min(MAX_OFFSET))
            .offset(offset.min(MAX_OFFSET))
            .all(&conn)
            .await?;

        with_items(&conn, models).await
    }

    /// Orders whose status is any of `statuses`. An empty set matches
    /// nothing and never reaches the store.
    pub async fn list_by_status(
        &self,
        session: &Session,
        statuses: &[OrderStatus],
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<Order>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.transactor.conn(session)?;

        let models = Orders::find()
            .filter(OrderCol::Status.is_in(statuses.iter().copied()))
            .order_by_desc(OrderCol::CreatedAt)
            .order_by_desc(OrderCol::Id)
            .limit(limit.min(MAX_OFFSET))
            .offset(offset.min(MAX_OFFSET))
            .all(&conn)
            .await?;

        with_items(&conn, models).await
    }
}

/// Loads the items of a page of orders in one query.
async fn with_items<C: ConnectionTrait>(
    conn: &C,
    models: Vec<OrderModel>,
) -> AppResult<Vec<Order>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut items_by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for item in OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(ids))
        .order_by_asc(OrderItemCol::OrderId)
        .order_by_asc(OrderItemCol::LineNo)
        .all(conn)
        .await?
    {
        items_by_order
            .entry(item.order_id)
            .or_default()
            .push(order_item_from_entity(item));
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let items = items_by_order.remove(&model.id).unwrap_or_default();
            order_from_entity(model, items)
        })
        .collect())
}

fn order_from_entity(model: OrderModel, items: Vec<OrderItem>) -> Order {
    Order {
        id: model.id,
        user_id: model.customer_id,
        restaurant_id: model.restaurant_id,
        status: model.status,
        total_amount: model.total_amount,
        items,
        pick_up: model.pick_up,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        menu_item_id: model.menu_item_id,
        quantity: model.quantity,
        unit_price: model.unit_price,
    }
}
