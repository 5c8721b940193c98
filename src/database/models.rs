use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rating::Rank;

/// One ladder entry, keyed by player id within a division collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elo_rating: Option<i64>,
    /// Legacy ladder slot, lower is better; only meaningful within one division.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Highest rank threshold already notified; 0 means never promoted.
    #[serde(default)]
    pub last_shown_promotion: i64,
}

fn default_true() -> bool {
    true
}

impl PlayerRecord {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            elo_rating: None,
            position: None,
            active: true,
            last_shown_promotion: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
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
    /// Division key, e.g. "d1".
    pub ladder: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Append-only promotion history entry, written once per threshold crossing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionRecord {
    pub player_name: String,
    pub new_rank: Rank,
    pub promotion_date: String,
    pub previous_elo: i64,
    pub new_elo: i64,
    pub user_id: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LadderEntry {
    pub ladder: String,
    pub elo: i64,
    pub active: bool,
}

/// Denormalized cross-division member view, fully rebuilt on each
/// aggregation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub username: String,
    pub ladders: Vec<LadderEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_ladder: Option<String>,
    pub highest_elo: i64,
    pub rank: Rank,
    pub is_non_participant: bool,
    pub last_updated: DateTime<Utc>,
}
