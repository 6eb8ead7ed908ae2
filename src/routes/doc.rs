use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        menu::{CreateCategoryRequest, MenuByCategory, MenuItemRequest},
        orders::{
            CancelOrderRequest, CreateOrderRequest, OrderHistory, OrderLineRequest, OrderList,
            UpdateOrderStatusRequest,
        },
        users::RegisterUserRequest,
    },
    metrics,
    models::{Category, Customer, MenuItem, Order, OrderAuditEntry, OrderItem, OrderStatus},
    response::{ApiResponse, Meta},
    routes::{health, menu, orders, users},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        metrics::metrics_handler,
        orders::create_order,
        orders::get_order,
        orders::list_user_orders,
        orders::list_orders_by_status,
        orders::update_order_status,
        orders::cancel_order,
        orders::order_history,
        menu::create_category,
        menu::get_menu_by_category,
        menu::create_menu_item,
        menu::get_menu_item,
        menu::update_menu_item,
        users::register_user
    ),
    components(
        schemas(
            Order,
            OrderItem,
            OrderStatus,
            OrderAuditEntry,
            Category,
            MenuItem,
            Customer,
            CreateOrderRequest,
            OrderLineRequest,
            UpdateOrderStatusRequest,
            CancelOrderRequest,
            OrderList,
            OrderHistory,
            CreateCategoryRequest,
            MenuItemRequest,
            MenuByCategory,
            RegisterUserRequest,
            Meta,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<OrderHistory>,
            ApiResponse<MenuItem>,
            ApiResponse<MenuByCategory>,
            ApiResponse<Customer>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Orders", description = "Order lifecycle endpoints"),
        (name = "Menu", description = "Menu catalog endpoints"),
        (name = "Users", description = "Customer registration"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
