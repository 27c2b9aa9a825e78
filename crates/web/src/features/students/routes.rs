use axum::{
    Router, middleware,
    routing::{get, patch},
};

use super::handlers::{create_student, delete_student, list_students, update_student};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/students/:id", patch(update_student).delete(delete_student))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
