use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        group::GroupSummary,
        score::LedgerAuditResponse,
        user::{CreateTeacherRequest, TeacherWithGroups},
    },
    models::User,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/admin/teachers",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Teachers with their groups and student counts", body = Vec<TeacherWithGroups>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin key required")
    ),
    tag = "admin"
)]
pub async fn list_teachers(State(db): State<Database>) -> Result<Response, WebError> {
    let teachers = services::list_teachers(db.pool()).await?;

    Ok(Json(teachers).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/teachers",
    request_body = CreateTeacherRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Teacher created successfully", body = User),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin key required"),
        (status = 409, description = "Email already registered")
    ),
    tag = "admin"
)]
pub async fn create_teacher(
    State(db): State<Database>,
    payload: Result<Json<CreateTeacherRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(req) = payload?;
    req.validate()?;

    let teacher = services::create_teacher(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(teacher)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/admin/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher user id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Teacher and everything they own deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin key required"),
        (status = 404, description = "Teacher not found")
    ),
    tag = "admin"
)]
pub async fn delete_teacher(
    State(db): State<Database>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;

    services::delete_teacher(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/admin/groups",
    operation_id = "list_all_groups",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All groups with teacher and student count", body = Vec<GroupSummary>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin key required")
    ),
    tag = "admin"
)]
pub async fn list_groups(State(db): State<Database>) -> Result<Response, WebError> {
    let groups = services::list_groups(db.pool()).await?;

    Ok(Json(groups).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/admin/groups/{id}",
    operation_id = "delete_group",
    params(
        ("id" = Uuid, Path, description = "Group id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Group, students and score records deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin key required"),
        (status = 404, description = "Group not found")
    ),
    tag = "admin"
)]
pub async fn delete_group(
    State(db): State<Database>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;

    services::delete_group(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/admin/audit",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Ledger audit for every student", body = Vec<LedgerAuditResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin key required")
    ),
    tag = "admin"
)]
pub async fn audit_ledger(State(db): State<Database>) -> Result<Response, WebError> {
    let audits = services::audit_ledger(db.pool()).await?;

    Ok(Json(audits).into_response())
}
