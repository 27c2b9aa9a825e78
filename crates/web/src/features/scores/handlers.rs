use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::score::{ApplyScoreRequest, ApplyScoreResponse, LedgerAuditResponse, ScoreHistoryParams},
    models::ScoreRecord,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::Caller;

use super::services;

#[utoipa::path(
    post,
    path = "/api/scores",
    request_body = ApplyScoreRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Points applied; body carries the committed total", body = ApplyScoreResponse),
        (status = 400, description = "Zero delta, empty reason or malformed body"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    ),
    tag = "scores"
)]
pub async fn apply_score(
    State(db): State<Database>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<ApplyScoreRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(req) = payload?;
    req.validate()?;

    let response = services::apply_score(db.pool(), &req).await?;
    tracing::debug!(
        "{} applied {} to {}",
        caller.role,
        req.points_delta,
        req.student_id
    );

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/scores",
    params(
        ("id" = Uuid, Path, description = "Student id"),
        ScoreHistoryParams
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Score records, newest first", body = Vec<ScoreRecord>),
        (status = 400, description = "Invalid limit"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    ),
    tag = "scores"
)]
pub async fn list_score_history(
    State(db): State<Database>,
    id: Result<Path<Uuid>, PathRejection>,
    params: Result<Query<ScoreHistoryParams>, QueryRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;
    let Query(params) = params?;
    params.validate().map_err(WebError::BadRequest)?;

    let records = services::list_history(db.pool(), id, params.limit).await?;

    Ok(Json(records).into_response())
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/audit",
    params(
        ("id" = Uuid, Path, description = "Student id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Cached total compared with the ledger sum", body = LedgerAuditResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    ),
    tag = "scores"
)]
pub async fn get_ledger_audit(
    State(db): State<Database>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;

    let audit = services::audit_student(db.pool(), id).await?;

    Ok(Json(audit).into_response())
}
