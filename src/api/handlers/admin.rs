use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

use super::AppState;

pub async fn admin_rebuild(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let auth_header = headers.get("Authorization").and_then(|h| h.to_str().ok());
    if auth_header != Some("Bearer secret") {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let aggregation = state.aggregation.clone();
    tokio::spawn(async move {
        log::info!("Admin triggered member rebuild started");
        match aggregation.rebuild().await {
            Ok(summary) => log::info!(
                "Admin triggered rebuild completed: {} members in {} batches",
                summary.members,
                summary.batches
            ),
            Err(e) => log::error!("Rebuild failed: {:?}", e),
        }
    });

    (StatusCode::ACCEPTED, "Rebuild triggered").into_response()
}
