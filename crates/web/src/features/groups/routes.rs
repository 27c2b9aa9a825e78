use axum::{Router, middleware, routing::get};

use super::handlers::{create_group, list_groups};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/groups", get(list_groups).post(create_group))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
