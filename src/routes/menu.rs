use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::menu::{CreateCategoryRequest, MenuByCategory, MenuItemRequest},
    error::{AppError, AppResult},
    models::{Category, MenuItem},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", post(create_category))
        .route("/categories/{id}", get(get_menu_by_category))
        .route("/items", post(create_menu_item))
        .route("/items/{id}", get(get_menu_item).put(update_menu_item))
}

#[utoipa::path(
    post,
    path = "/api/menu/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = ApiResponse<Category>),
        (status = 400, description = "Invalid request"),
    ),
    tag = "Menu"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    let category = state
        .menu
        .create_category(payload.name, payload.sort_order)
        .await?;
    Ok(Json(ApiResponse::success("Category created", category, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/menu/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category with its items", body = ApiResponse<MenuByCategory>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Menu"
)]
pub async fn get_menu_by_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MenuByCategory>>> {
    let (category, items) = state.menu.get_menu_by_category(id).await?;
    Ok(Json(ApiResponse::success(
        "Menu",
        MenuByCategory { category, items },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/menu/items",
    request_body = MenuItemRequest,
    responses(
        (status = 200, description = "Menu item created", body = ApiResponse<MenuItem>),
        (status = 400, description = "Invalid request"),
    ),
    tag = "Menu"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    Json(payload): Json<MenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let item = payload.into_menu_item(Uuid::nil())?;
    let item = state.menu.create_menu_item(item).await?;
    Ok(Json(ApiResponse::success("Menu item created", item, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/menu/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Menu item", body = ApiResponse<MenuItem>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Menu"
)]
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let item = state.menu.get_menu_item(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(ApiResponse::success("Menu item", item, None)))
}

#[utoipa::path(
    put,
    path = "/api/menu/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Menu item ID")
    ),
    request_body = MenuItemRequest,
    responses(
        (status = 200, description = "Menu item replaced", body = ApiResponse<MenuItem>),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Menu"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let item = payload.into_menu_item(id)?;
    let item = state.menu.update_menu_item(item).await?;
    Ok(Json(ApiResponse::success("Updated", item, Some(Meta::empty()))))
}
