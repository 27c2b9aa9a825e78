use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::{IntoResponse, Response},
};
use reporting::{ProviderStatus, Report, ReportGenerator, ReportSnapshot};
use storage::Database;
use uuid::Uuid;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = ReportSnapshot,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Report generated by a provider or from the template", body = Report),
        (status = 400, description = "Empty class or inconsistent snapshot"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "reports"
)]
pub async fn generate_report(
    State(reports): State<Arc<ReportGenerator>>,
    payload: Result<Json<ReportSnapshot>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(snapshot) = payload?;

    let report = reports.generate(&snapshot).await?;

    Ok(Json(report).into_response())
}

#[utoipa::path(
    get,
    path = "/api/groups/{id}/report",
    params(
        ("id" = Uuid, Path, description = "Group id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Report for the group's current roster", body = Report),
        (status = 400, description = "Group has no students"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Group not found")
    ),
    tag = "reports"
)]
pub async fn generate_group_report(
    State(db): State<Database>,
    State(reports): State<Arc<ReportGenerator>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, WebError> {
    let Path(id) = id?;

    let snapshot = services::load_group_snapshot(db.pool(), id).await?;
    let report = reports.generate(&snapshot).await?;

    Ok(Json(report).into_response())
}

#[utoipa::path(
    get,
    path = "/api/reports/providers",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Health of each configured provider, in fallback order", body = Vec<ProviderStatus>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin key required")
    ),
    tag = "reports"
)]
pub async fn list_provider_status(
    State(reports): State<Arc<ReportGenerator>>,
) -> Result<Response, WebError> {
    let statuses = reports.provider_status().await;

    Ok(Json(statuses).into_response())
}
