use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{generate_group_report, generate_report, list_provider_status};
use crate::middleware::auth::{ApiKeys, require_admin, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let admin = Router::new()
        .route("/reports/providers", get(list_provider_status))
        .route_layer(middleware::from_fn_with_state(api_keys.clone(), require_admin));

    Router::new()
        .route("/reports", post(generate_report))
        .route("/groups/:id/report", get(generate_group_report))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
        .merge(admin)
}
