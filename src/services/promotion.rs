use chrono::{DateTime, Utc};
use log::info;

use crate::config::settings::{Division, PromotionPolicy};
use crate::database::models::PromotionRecord;
use crate::database::{PlayerRepository, PromotionRepository};
use crate::errors::LadderError;
use crate::rating::{self, Rank};

/// Detects rank-threshold crossings and records each one exactly once.
/// The player's `lastShownPromotion` watermark suppresses repeat
/// notifications; the history collection itself is never consulted.
#[derive(Clone)]
pub struct PromotionService {
    players: PlayerRepository,
    promotions: PromotionRepository,
    policy: PromotionPolicy,
}

impl PromotionService {
    pub fn new(
        players: PlayerRepository,
        promotions: PromotionRepository,
        policy: PromotionPolicy,
    ) -> Self {
        Self {
            players,
            promotions,
            policy,
        }
    }

    pub async fn check_and_record(
        &self,
        division: &Division,
        user_id: &str,
        new_elo: i64,
        old_elo: i64,
    ) -> Result<Option<Rank>, LadderError> {
        self.check_and_record_at(division, user_id, new_elo, old_elo, Utc::now())
            .await
    }

    pub async fn check_and_record_at(
        &self,
        division: &Division,
        user_id: &str,
        new_elo: i64,
        old_elo: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Rank>, LadderError> {
        let crossed = match self.policy {
            PromotionPolicy::FirstCrossed => rating::first_crossed(old_elo, new_elo),
            PromotionPolicy::HighestCrossed => rating::highest_crossed(old_elo, new_elo),
        };
        let Some((threshold, rank)) = crossed else {
            return Ok(None);
        };

        let player = self
            .players
            .find(division.collection, user_id)
            .await?
            .ok_or_else(|| LadderError::PlayerNotFound(user_id.to_string()))?;

        if threshold <= player.last_shown_promotion {
            return Ok(None);
        }

        let record = PromotionRecord {
            player_name: player.username,
            new_rank: rank,
            promotion_date: now.format("%Y-%m-%d").to_string(),
            previous_elo: old_elo,
            new_elo,
            user_id: user_id.to_string(),
            timestamp: now.timestamp_millis(),
        };
        let record_id = format!("{user_id}-{}", record.timestamp);

        self.promotions.append(&record_id, &record).await?;
        self.players
            .set_promotion_watermark(division.collection, user_id, threshold)
            .await?;

        info!("{} promoted to {} on {}", user_id, rank, division.key);
        Ok(Some(rank))
    }
}
