use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::student::{
        CreateStudentRequest, StudentListParams, StudentWithRecords, UpdateStudentRequest,
    },
    models::Student,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentListParams),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Students ranked by total score with their records", body = Vec<StudentWithRecords>),
        (status = 400, description = "Missing or malformed group_id"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "students"
)]
pub async fn list_students(
    State(db): State<Database>,
    params: Result<Query<StudentListParams>, QueryRejection>,
) -> Result<Response, WebError> {
    let Query(params) = params?;

    let students = services::list_students(db.pool(), params.group_id).await?;

    Ok(Json(students).into_response())
}

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Student created with zero points", body = Student),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Group not found"),
        (status = 409, description = "Name already used in the group")
    ),
    tag = "students"
)]
pub async fn create_student(
    State(db): State<Database>,
    payload: Result<Json<CreateStudentRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(req) = payload?;
    req.validate()?;

    let student = services::create_student(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(student)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student id")
    ),
    request_body = UpdateStudentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Student updated successfully", body = Student),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student or target group not found")
    ),
    tag = "students"
)]
pub async fn update_student(
    State(db): State<Database>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateStudentRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;
    let Json(update_req) = payload?;
    update_req.validate()?;

    let updated = services::update_student(db.pool(), id, &update_req).await?;

    Ok(Json(updated).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Student and score records deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    ),
    tag = "students"
)]
pub async fn delete_student(
    State(db): State<Database>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;

    services::delete_student(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
