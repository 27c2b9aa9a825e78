use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::group::{CreateGroupRequest, GroupListParams, GroupWithStudents},
    models::Group,
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/groups",
    params(GroupListParams),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The teacher's groups, newest first", body = Vec<GroupWithStudents>),
        (status = 400, description = "Missing or malformed teacher_id"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "groups"
)]
pub async fn list_groups(
    State(db): State<Database>,
    params: Result<Query<GroupListParams>, QueryRejection>,
) -> Result<Response, WebError> {
    let Query(params) = params?;

    let groups = services::list_groups_for_teacher(db.pool(), params.teacher_id).await?;

    Ok(Json(groups).into_response())
}

#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = CreateGroupRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Group created successfully", body = Group),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Teacher not found")
    ),
    tag = "groups"
)]
pub async fn create_group(
    State(db): State<Database>,
    payload: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(req) = payload?;
    req.validate()?;

    let group = services::create_group(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(group)).into_response())
}
