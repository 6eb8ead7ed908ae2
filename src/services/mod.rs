pub mod menu_service;
pub mod order_service;
pub mod user_service;

pub use menu_service::MenuService;
pub use order_service::OrderService;
pub use user_service::UserService;
