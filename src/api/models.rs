use serde::{Deserialize, Serialize};

use crate::database::models::LadderEntry;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LadderListItem {
    pub rank: usize,
    pub player_id: String,
    pub username: String,
    pub elo_rating: i64,
    pub position: Option<i64>,
    pub active: bool,
    pub rank_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LadderResponse {
    pub division: String,
    pub players: Vec<LadderListItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberListItem {
    pub user_id: String,
    pub username: String,
    pub ladders: Vec<LadderEntry>,
    pub primary_ladder: Option<String>,
    pub highest_elo: i64,
    pub rank: String,
    pub is_non_participant: bool,
    pub last_updated: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportRequest {
    pub winner_id: String,
    pub loser_id: String,
    pub winner_username: String,
    pub loser_username: String,
    pub winner_score: i64,
    pub loser_score: i64,
    #[serde(default)]
    pub winner_suicides: i64,
    #[serde(default)]
    pub loser_suicides: i64,
    #[serde(default)]
    pub map: String,
    #[serde(default)]
    pub comments: String,
    pub ladder: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportResponse {
    pub id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingReportItem {
    pub id: String,
    pub winner_username: String,
    pub loser_username: String,
    pub winner_score: i64,
    pub loser_score: i64,
    pub map: String,
    pub comments: String,
    pub ladder: String,
    pub created_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmReportResponse {
    pub winner_new_rating: i64,
    pub loser_new_rating: i64,
    pub swapped: bool,
    pub winner_promotion: Option<String>,
    pub loser_promotion: Option<String>,
}
