use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{Database, models::User};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/users",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All users, newest first", body = Vec<User>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin key required")
    ),
    tag = "users"
)]
pub async fn list_users(State(db): State<Database>) -> Result<Response, WebError> {
    let users = services::list_users(db.pool()).await?;

    Ok(Json(users).into_response())
}
