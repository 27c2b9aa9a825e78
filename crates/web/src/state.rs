use std::sync::Arc;

use axum::extract::FromRef;
use reporting::ReportGenerator;
use storage::Database;

use crate::middleware::auth::ApiKeys;

/// Shared, immutable application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub reports: Arc<ReportGenerator>,
    pub api_keys: ApiKeys,
}

impl AppState {
    pub fn new(db: Database, reports: ReportGenerator, api_keys: ApiKeys) -> Self {
        Self {
            db,
            reports: Arc::new(reports),
            api_keys,
        }
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for Arc<ReportGenerator> {
    fn from_ref(state: &AppState) -> Self {
        state.reports.clone()
    }
}
