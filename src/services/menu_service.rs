use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Category, MenuItem},
    repository::MenuRepository,
    transactor::Session,
};

#[derive(Clone)]
pub struct MenuService {
    menu: MenuRepository,
}

impl MenuService {
    pub fn new(menu: MenuRepository) -> Self {
        Self { menu }
    }

    pub async fn get_menu_by_category(
        &self,
        category_id: Uuid,
    ) -> AppResult<(Category, Vec<MenuItem>)> {
        let session = Session::pooled();
        let category = self
            .menu
            .get_category(&session, category_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let items = self.menu.get_items_by_category(&session, category_id).await?;
        Ok((category, items))
    }

    pub async fn get_menu_item(&self, id: Uuid) -> AppResult<Option<MenuItem>> {
        self.menu.find_menu_item(&Session::pooled(), id).await
    }

    pub async fn create_category(&self, name: String, sort_order: i32) -> AppResult<Category> {
        let category = self
            .menu
            .create_category(&Session::pooled(), name, sort_order)
            .await?;
        tracing::info!(category_id = %category.id, "menu category created");
        Ok(category)
    }

    pub async fn create_menu_item(&self, item: MenuItem) -> AppResult<MenuItem> {
        let item = self.menu.create_menu_item(&Session::pooled(), item).await?;
        tracing::info!(menu_item_id = %item.id, price = item.price, "menu item created");
        Ok(item)
    }

    /// Catalog changes never touch existing orders, which keep their own
    /// price snapshot.
    pub async fn update_menu_item(&self, item: MenuItem) -> AppResult<MenuItem> {
        let item = self
            .menu
            .update_menu_item(&Session::pooled(), item)
            .await?
            .ok_or(AppError::NotFound)?;
        tracing::info!(menu_item_id = %item.id, price = item.price, "menu item updated");
        Ok(item)
    }
}
