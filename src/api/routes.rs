use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin::admin_rebuild,
    ladder::{get_ladder, get_members},
    reports::{confirm_report, get_pending_reports, submit_report},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/ladder/:division", get(get_ladder))
        .route("/api/members", get(get_members))
        .route("/api/reports", post(submit_report))
        .route("/api/reports/pending", get(get_pending_reports))
        .route("/api/reports/:id/confirm", post(confirm_report))
        .route("/api/admin/rebuild", post(admin_rebuild))
        .with_state(state)
}
