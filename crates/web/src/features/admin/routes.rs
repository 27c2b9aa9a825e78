use axum::{
    Router, middleware,
    routing::{delete, get},
};

use super::handlers::{
    audit_ledger, create_teacher, delete_group, delete_teacher, list_groups, list_teachers,
};
use crate::middleware::auth::{ApiKeys, require_admin};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/admin/teachers", get(list_teachers).post(create_teacher))
        .route("/admin/teachers/:id", delete(delete_teacher))
        .route("/admin/groups", get(list_groups))
        .route("/admin/groups/:id", delete(delete_group))
        .route("/admin/audit", get(audit_ledger))
        .route_layer(middleware::from_fn_with_state(api_keys, require_admin))
}
