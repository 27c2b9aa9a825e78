use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{apply_score, get_ledger_audit, list_score_history};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/scores", post(apply_score))
        .route("/students/:id/scores", get(list_score_history))
        .route("/students/:id/audit", get(get_ledger_audit))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
