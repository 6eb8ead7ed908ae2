use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    entity::audit_logs::{
        ActiveModel as AuditActive, Column as AuditCol, Entity as AuditLogs, Model as AuditModel,
    },
    error::AppResult,
    models::{OrderAuditEntry, OrderStatus},
};

pub const ORDER_CREATED: &str = "order_created";
pub const ORDER_STATUS_UPDATE: &str = "order_status_update";
pub const ORDER_CANCELLED: &str = "order_cancelled";

/// Appends an audit row on `conn`. Callers pass a transactional connection
/// when the row must commit or roll back together with the change it records.
pub async fn log_audit<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
    action: &str,
    status: Option<OrderStatus>,
    reason: Option<&str>,
) -> AppResult<()> {
    AuditActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        action: Set(action.to_string()),
        status: Set(status),
        reason: Set(reason.map(str::to_string)),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await?;

    Ok(())
}

pub async fn list_for_order<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
) -> AppResult<Vec<OrderAuditEntry>> {
    let entries = AuditLogs::find()
        .filter(AuditCol::OrderId.eq(order_id))
        .order_by_asc(AuditCol::CreatedAt)
        .order_by_asc(AuditCol::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(audit_from_entity)
        .collect();
    Ok(entries)
}

fn audit_from_entity(model: AuditModel) -> OrderAuditEntry {
    OrderAuditEntry {
        id: model.id,
        order_id: model.order_id,
        action: model.action,
        status: model.status,
        reason: model.reason,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
