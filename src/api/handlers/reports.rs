use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::{
    ConfirmReportResponse, PendingReportItem, SubmitReportRequest, SubmitReportResponse,
};
use crate::errors::LadderError;
use crate::services::reports::NewReport;

use super::AppState;

pub async fn submit_report(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitReportRequest>,
) -> impl IntoResponse {
    let report = NewReport {
        winner_id: request.winner_id,
        loser_id: request.loser_id,
        winner_username: request.winner_username,
        loser_username: request.loser_username,
        winner_score: request.winner_score,
        loser_score: request.loser_score,
        winner_suicides: request.winner_suicides,
        loser_suicides: request.loser_suicides,
        map: request.map,
        comments: request.comments,
        ladder: request.ladder,
    };

    match state.reports.submit(report).await {
        Ok(id) => (StatusCode::CREATED, Json(SubmitReportResponse { id })).into_response(),
        Err(LadderError::UnknownDivision(d)) => {
            (StatusCode::BAD_REQUEST, format!("Unknown division: {d}")).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Submit Error: {e}")).into_response(),
    }
}

pub async fn get_pending_reports(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let pending = match state.reports.pending().await {
        Ok(pending) => pending,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {e}"))
                .into_response()
        }
    };

    let items: Vec<PendingReportItem> = pending
        .into_iter()
        .map(|(id, report)| PendingReportItem {
            id,
            winner_username: report.winner_username,
            loser_username: report.loser_username,
            winner_score: report.winner_score,
            loser_score: report.loser_score,
            map: report.map,
            comments: report.comments,
            ladder: report.ladder,
            created_at: report.created_at.to_rfc3339(),
        })
        .collect();

    Json(items).into_response()
}

pub async fn confirm_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.reports.confirm(&id).await {
        Ok(confirmed) => Json(ConfirmReportResponse {
            winner_new_rating: confirmed.outcome.winner_new_rating,
            loser_new_rating: confirmed.outcome.loser_new_rating,
            swapped: confirmed.outcome.swapped,
            winner_promotion: confirmed.winner_promotion.map(|rank| rank.to_string()),
            loser_promotion: confirmed.loser_promotion.map(|rank| rank.to_string()),
        })
        .into_response(),
        Err(LadderError::ReportNotFound(id)) => {
            (StatusCode::NOT_FOUND, format!("Report {id} not found")).into_response()
        }
        Err(LadderError::PlayerNotFound(id)) => {
            (StatusCode::NOT_FOUND, format!("Player {id} not found")).into_response()
        }
        Err(LadderError::UnknownDivision(d)) => {
            (StatusCode::BAD_REQUEST, format!("Unknown division: {d}")).into_response()
        }
        Err(e) => {
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Confirm Error: {e}")).into_response()
        }
    }
}
