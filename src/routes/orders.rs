use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{
        CancelOrderRequest, CreateOrderRequest, OrderHistory, OrderList, UpdateOrderStatusRequest,
    },
    error::{AppError, AppResult},
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::{StatusOrdersQuery, UserOrdersQuery},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_user_orders).post(create_order))
        .route("/by-status", get(list_orders_by_status))
        .route("/{id}", get(get_order))
        .route("/{id}/history", get(order_history))
        .route("/{id}/status", patch(update_order_status))
        .route("/{id}/cancel", post(cancel_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order created with price snapshots", body = ApiResponse<Order>),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Menu item not found"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let lines = payload.validate()?;
    let order = state
        .orders
        .create_order(payload.user_id, payload.restaurant_id, lines, payload.pick_up)
        .await?;
    Ok(Json(ApiResponse::success("Order created", order, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<Order>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.get_order(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(ApiResponse::success("OK", order, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("user_id" = Uuid, Query, description = "Customer ID"),
        ("limit" = Option<u64>, Query, description = "Page size, default 20, max 100"),
        ("offset" = Option<u64>, Query, description = "Rows to skip, default 0")
    ),
    responses(
        (status = 200, description = "Orders of a customer, newest first", body = ApiResponse<OrderList>),
    ),
    tag = "Orders"
)]
pub async fn list_user_orders(
    State(state): State<AppState>,
    Query(query): Query<UserOrdersQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let (limit, offset) = query.pagination().normalize();
    let items = state
        .orders
        .list_user_orders(query.user_id, limit, offset)
        .await?;
    let meta = Meta::page(limit, offset, items.len());
    Ok(Json(ApiResponse::success("Ok", OrderList { items }, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/orders/by-status",
    params(
        ("statuses" = Option<String>, Query, description = "Comma separated statuses, e.g. paid,ready"),
        ("limit" = Option<u64>, Query, description = "Page size, default 20, max 100"),
        ("offset" = Option<u64>, Query, description = "Rows to skip, default 0")
    ),
    responses(
        (status = 200, description = "Orders in any of the statuses, newest first", body = ApiResponse<OrderList>),
        (status = 400, description = "Unknown status"),
    ),
    tag = "Orders"
)]
pub async fn list_orders_by_status(
    State(state): State<AppState>,
    Query(query): Query<StatusOrdersQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let statuses = query.parse_statuses()?;
    let (limit, offset) = query.pagination().normalize();
    let items = state
        .orders
        .list_orders_by_status(&statuses, limit, offset)
        .await?;
    let meta = Meta::page(limit, offset, items.len());
    Ok(Json(ApiResponse::success("Ok", OrderList { items }, Some(meta))))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status overwritten", body = ApiResponse<Order>),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let status = payload.validate()?;
    let order = state.orders.update_order_status(id, status).await?;
    Ok(Json(ApiResponse::success("Order updated", order, Some(Meta::empty()))))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = CancelOrderRequest,
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<Order>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.cancel_order(id, &payload.reason).await?;
    Ok(Json(ApiResponse::success("Order cancelled", order, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/history",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Audit trail, oldest first", body = ApiResponse<OrderHistory>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Orders"
)]
pub async fn order_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderHistory>>> {
    let entries = state.orders.order_history(id).await?;
    let history = OrderHistory {
        order_id: id,
        entries,
    };
    Ok(Json(ApiResponse::success("OK", history, Some(Meta::empty()))))
}
