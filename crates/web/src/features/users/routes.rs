use axum::{Router, middleware, routing::get};

use super::handlers::list_users;
use crate::middleware::auth::{ApiKeys, require_admin};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route_layer(middleware::from_fn_with_state(api_keys, require_admin))
}
