use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{Database, dto::roster::RosterGroup};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/roster",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Groups newest first, students ranked by total score", body = Vec<RosterGroup>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "roster"
)]
pub async fn list_roster(State(db): State<Database>) -> Result<Response, WebError> {
    let roster = services::list_roster(db.pool()).await?;

    Ok(Json(roster).into_response())
}
