use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::users::RegisterUserRequest,
    error::{AppError, AppResult},
    models::Customer,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/register", post(register_user))
}

#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 200, description = "Existing or newly registered customer", body = ApiResponse<Customer>),
        (status = 400, description = "Invalid phone"),
    ),
    tag = "Users"
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let phone = payload.phone.trim();
    if phone.is_empty() {
        return Err(AppError::BadRequest("phone must not be empty".into()));
    }
    let customer = state.users.register_user(phone, payload.name).await?;
    Ok(Json(ApiResponse::success("Registered", customer, Some(Meta::empty()))))
}
