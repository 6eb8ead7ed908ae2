pub mod audit_logs;
pub mod customers;
pub mod menu_categories;
pub mod menu_items;
pub mod order_items;
pub mod orders;

pub use audit_logs::Entity as AuditLogs;
pub use customers::Entity as Customers;
pub use menu_categories::Entity as MenuCategories;
pub use menu_items::Entity as MenuItems;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
