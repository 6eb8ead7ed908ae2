use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    entity::{
        menu_categories::{
            ActiveModel as CategoryActive, Entity as MenuCategories, Model as CategoryModel,
        },
        menu_items::{
            ActiveModel as MenuItemActive, Column as MenuItemCol, Entity as MenuItems,
            Model as MenuItemModel,
        },
    },
    error::AppResult,
    models::{Category, MenuItem},
    transactor::{Session, Transactor},
};

/// Read access to the catalog, as needed when pricing an order.
#[async_trait]
pub trait MenuLookup: Send + Sync {
    async fn get_menu_item(&self, id: Uuid) -> AppResult<Option<MenuItem>>;
}

#[derive(Clone)]
pub struct MenuRepository {
    transactor: Transactor,
}

impl MenuRepository {
    pub fn new(transactor: Transactor) -> Self {
        Self { transactor }
    }

    pub async fn get_category(&self, session: &Session, id: Uuid) -> AppResult<Option<Category>> {
        let conn = self.transactor.conn(session)?;
        let category = MenuCategories::find_by_id(id)
            .one(&conn)
            .await?
            .map(category_from_entity);
        Ok(category)
    }

    pub async fn get_items_by_category(
        &self,
        session: &Session,
        category_id: Uuid,
    ) -> AppResult<Vec<MenuItem>> {
        let conn = self.transactor.conn(session)?;
        let items = MenuItems::find()
            .filter(MenuItemCol::CategoryId.eq(category_id))
            .order_by_asc(MenuItemCol::Name)
            .all(&conn)
            .await?
            .into_iter()
            .map(menu_item_from_entity)
            .collect();
        Ok(items)
    }

    pub async fn create_category(
        &self,
        session: &Session,
        name: String,
        sort_order: i32,
    ) -> AppResult<Category> {
        let conn = self.transactor.conn(session)?;
        let model = CategoryActive {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            sort_order: Set(sort_order),
        }
        .insert(&conn)
        .await?;
        Ok(category_from_entity(model))
    }

    pub async fn find_menu_item(&self, session: &Session, id: Uuid) -> AppResult<Option<MenuItem>> {
        let conn = self.transactor.conn(session)?;
        let item = MenuItems::find_by_id(id)
            .one(&conn)
            .await?
            .map(menu_item_from_entity);
        Ok(item)
    }

    /// Inserts `item` under a fresh id; the id field of the argument is ignored.
    pub async fn create_menu_item(&self, session: &Session, item: MenuItem) -> AppResult<MenuItem> {
        let conn = self.transactor.conn(session)?;
        let model = MenuItemActive {
            id: Set(Uuid::new_v4()),
            category_id: Set(item.category_id),
            name: Set(item.name),
            description: Set(item.description),
            price: Set(item.price),
            active: Set(item.active),
            image_url: Set(item.image_url),
        }
        .insert(&conn)
        .await?;
        Ok(menu_item_from_entity(model))
    }

    /// Overwrites every column of an existing item. `None` when absent.
    pub async fn update_menu_item(
        &self,
        session: &Session,
        item: MenuItem,
    ) -> AppResult<Option<MenuItem>> {
        let conn = self.transactor.conn(session)?;
        let Some(existing) = MenuItems::find_by_id(item.id).one(&conn).await? else {
            return Ok(None);
        };

        let mut active: MenuItemActive = existing.into();
        active.category_id = Set(item.category_id);
        active.name = Set(item.name);
        active.description = Set(item.description);
        active.price = Set(item.price);
        active.active = Set(item.active);
        active.image_url = Set(item.image_url);
        let model = active.update(&conn).await?;
        Ok(Some(menu_item_from_entity(model)))
    }
}

#[async_trait]
impl MenuLookup for MenuRepository {
    async fn get_menu_item(&self, id: Uuid) -> AppResult<Option<MenuItem>> {
        self.find_menu_item(&Session::pooled(), id).await
    }
}

fn category_from_entity(model: CategoryModel) -> Category {
    Category {
        id: model.id,
        name: model.name,
        sort_order: model.sort_order,
    }
}

fn menu_item_from_entity(model: MenuItemModel) -> MenuItem {
    MenuItem {
        id: model.id,
        category_id: model.category_id,
        name: model.name,
        description: model.description,
        price: model.price,
        active: model.active,
        image_url: model.image_url,
    }
}
