use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    metrics::HttpMetrics,
    repository::{CustomerRepository, MenuRepository, OrderRepository},
    services::{MenuService, OrderService, UserService},
    transactor::Transactor,
};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub orders: OrderService,
    pub menu: MenuService,
    pub users: UserService,
    pub metrics: HttpMetrics,
}

impl AppState {
    /// Wires repositories and services over one shared pool.
    pub fn new(orm: DatabaseConnection, metrics: HttpMetrics) -> Self {
        let transactor = Transactor::new(orm.clone());
        let menu_repo = MenuRepository::new(transactor.clone());
        let orders = OrderService::new(
            OrderRepository::new(transactor.clone()),
            Arc::new(menu_repo.clone()),
            transactor.clone(),
        );
        Self {
            orm,
            orders,
            menu: MenuService::new(menu_repo),
            users: UserService::new(CustomerRepository::new(transactor)),
            metrics,
        }
    }
}
