pub mod customers;
pub mod menu;
pub mod orders;

pub use customers::CustomerRepository;
pub use menu::{MenuLookup, MenuRepository};
pub use orders::OrderRepository;
