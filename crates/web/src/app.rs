use std::time::Duration;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::features::{admin, groups, reports, roster, scores, students, users};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        scores::handlers::apply_score,
        scores::handlers::list_score_history,
        scores::handlers::get_ledger_audit,
        roster::handlers::list_roster,
        reports::handlers::generate_report,
        reports::handlers::generate_group_report,
        reports::handlers::list_provider_status,
        groups::handlers::list_groups,
        groups::handlers::create_group,
        students::handlers::list_students,
        students::handlers::create_student,
        students::handlers::update_student,
        students::handlers::delete_student,
        users::handlers::list_users,
        admin::handlers::list_teachers,
        admin::handlers::create_teacher,
        admin::handlers::delete_teacher,
        admin::handlers::list_groups,
        admin::handlers::delete_group,
        admin::handlers::audit_ledger,
    ),
    components(
        schemas(
            storage::dto::score::ApplyScoreRequest,
            storage::dto::score::ApplyScoreResponse,
            storage::dto::score::LedgerAuditResponse,
            storage::dto::roster::RosterGroup,
            storage::dto::roster::RosterStudent,
            storage::dto::roster::TeacherInfo,
            storage::dto::group::CreateGroupRequest,
            storage::dto::group::GroupWithStudents,
            storage::dto::group::GroupSummary,
            storage::dto::student::CreateStudentRequest,
            storage::dto::student::UpdateStudentRequest,
            storage::dto::student::StudentWithRecords,
            storage::dto::user::CreateTeacherRequest,
            storage::dto::user::TeacherWithGroups,
            storage::dto::user::TeacherGroupSummary,
            storage::models::Group,
            storage::models::Role,
            storage::models::ScoreRecord,
            storage::models::Student,
            storage::models::User,
            reporting::ReportSnapshot,
            reporting::SnapshotStudent,
            reporting::Report,
            reporting::ReportSource,
            reporting::ProviderStatus,
        )
    ),
    tags(
        (name = "scores", description = "Award and deduct points, read the ledger"),
        (name = "roster", description = "Groups with ranked students"),
        (name = "reports", description = "Class report generation"),
        (name = "groups", description = "Teacher group management"),
        (name = "students", description = "Student management"),
        (name = "users", description = "User accounts"),
        (name = "admin", description = "Administrator endpoints"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

/// Assemble the full application: `/api` routes, OpenAPI docs and HTTP layers.
pub fn build_router(state: AppState) -> Router {
    let api_keys = state.api_keys.clone();

    let api = Router::new()
        .merge(scores::routes::routes(api_keys.clone()))
        .merge(roster::routes::routes(api_keys.clone()))
        .merge(reports::routes::routes(api_keys.clone()))
        .merge(groups::routes::routes(api_keys.clone()))
        .merge(students::routes::routes(api_keys.clone()))
        .merge(users::routes::routes(api_keys.clone()))
        .merge(admin::routes::routes(api_keys));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .nest("/api", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
