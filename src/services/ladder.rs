use log::info;

use crate::config::settings::{Division, RatingSettings};
use crate::database::PlayerRepository;
use crate::errors::LadderError;
use crate::rating;

#[derive(Debug, Clone, Copy)]
pub struct MatchOutcome {
    pub winner_old_rating: i64,
    pub winner_new_rating: i64,
    pub loser_old_rating: i64,
    pub loser_new_rating: i64,
    pub swapped: bool,
}

/// Applies a confirmed match result to one division ladder: loads both
/// players, fills in missing ratings with the default, recomputes ratings
/// and swaps ladder positions when the winner sat below the loser.
#[derive(Clone)]
pub struct LadderService {
    players: PlayerRepository,
    settings: RatingSettings,
}

impl LadderService {
    pub fn new(players: PlayerRepository, settings: RatingSettings) -> Self {
        Self { players, settings }
    }

    pub async fn apply_match_result(
        &self,
        division: &Division,
        winner_id: &str,
        loser_id: &str,
    ) -> Result<MatchOutcome, LadderError> {
        let collection = division.collection;

        let (winner, loser) = tokio::try_join!(
            self.players.find(collection, winner_id),
            self.players.find(collection, loser_id),
        )?;
        let winner = winner.ok_or_else(|| LadderError::PlayerNotFound(winner_id.to_string()))?;
        let loser = loser.ok_or_else(|| LadderError::PlayerNotFound(loser_id.to_string()))?;

        let winner_old = self.ensure_rating(collection, winner_id, winner.elo_rating).await?;
        let loser_old = self.ensure_rating(collection, loser_id, loser.elo_rating).await?;

        let ratings = rating::compute_ratings(winner_old, loser_old, self.settings.k_factor);

        // Two independent writes; a failure between them leaves the first committed.
        self.players
            .set_rating(collection, winner_id, ratings.new_winner_rating)
            .await?;
        self.players
            .set_rating(collection, loser_id, ratings.new_loser_rating)
            .await?;

        let swapped = self
            .swap_positions_if_needed(collection, winner_id, &winner.position, loser_id, &loser.position)
            .await?;

        info!(
            "Match on {}: {} {} -> {}, {} {} -> {}{}",
            division.key,
            winner_id,
            winner_old,
            ratings.new_winner_rating,
            loser_id,
            loser_old,
            ratings.new_loser_rating,
            if swapped { " (positions swapped)" } else { "" }
        );

        Ok(MatchOutcome {
            winner_old_rating: winner_old,
            winner_new_rating: ratings.new_winner_rating,
            loser_old_rating: loser_old,
            loser_new_rating: ratings.new_loser_rating,
            swapped,
        })
    }

    /// Missing ratings get the default and that default is persisted as its
    /// own write, independent of the match outcome.
    async fn ensure_rating(
        &self,
        collection: &str,
        id: &str,
        current: Option<i64>,
    ) -> Result<i64, LadderError> {
        match current {
            Some(rating) => Ok(rating),
            None => {
                let default = self.settings.default_rating;
                self.players.set_rating(collection, id, default).await?;
                Ok(default)
            }
        }
    }

    /// Winner takes the better (lower) slot when sitting below the loser.
    /// Only the ordering comparison matters, never rating magnitude.
    async fn swap_positions_if_needed(
        &self,
        collection: &str,
        winner_id: &str,
        winner_position: &Option<i64>,
        loser_id: &str,
        loser_position: &Option<i64>,
    ) -> Result<bool, LadderError> {
        let (Some(winner_pos), Some(loser_pos)) = (winner_position, loser_position) else {
            return Ok(false);
        };
        if winner_pos <= loser_pos {
            return Ok(false);
        }

        self.players
            .set_position(collection, winner_id, *loser_pos)
            .await?;
        self.players
            .set_position(collection, loser_id, *winner_pos)
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::database::models::PlayerRecord;
    use crate::store::MemoryStore;

    const DIVISION: Division = Division { key: "d1", collection: "playersD1" };

    fn service(store: Arc<MemoryStore>) -> LadderService {
        LadderService::new(PlayerRepository::new(store), RatingSettings::default())
    }

    async fn seed_player(
        store: &Arc<MemoryStore>,
        id: &str,
        rating: Option<i64>,
        position: Option<i64>,
    ) {
        let players = PlayerRepository::new(store.clone());
        let mut player = PlayerRecord::new(id.to_uppercase());
        player.elo_rating = rating;
        player.position = position;
        players.save(DIVISION.collection, id, &player).await.unwrap();
    }

    #[tokio::test]
    async fn missing_player_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        seed_player(&store, "alice", Some(1200), None).await;

        let err = service(store)
            .apply_match_result(&DIVISION, "alice", "ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, LadderError::PlayerNotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn ratings_update_from_equal_start() {
        let store = Arc::new(MemoryStore::new());
        seed_player(&store, "alice", Some(1200), None).await;
        seed_player(&store, "bob", Some(1200), None).await;

        let outcome = service(store.clone())
            .apply_match_result(&DIVISION, "alice", "bob")
            .await
            .unwrap();

        assert_eq!(outcome.winner_new_rating, 1216);
        assert_eq!(outcome.loser_new_rating, 1184);
        assert!(!outcome.swapped);

        let players = PlayerRepository::new(store);
        let alice = players.find(DIVISION.collection, "alice").await.unwrap().unwrap();
        let bob = players.find(DIVISION.collection, "bob").await.unwrap().unwrap();
        assert_eq!(alice.elo_rating, Some(1216));
        assert_eq!(bob.elo_rating, Some(1184));
    }

    #[tokio::test]
    async fn missing_ratings_get_persisted_defaults() {
        let store = Arc::new(MemoryStore::new());
        seed_player(&store, "alice", None, None).await;
        seed_player(&store, "bob", None, None).await;

        let outcome = service(store.clone())
            .apply_match_result(&DIVISION, "alice", "bob")
            .await
            .unwrap();

        // Deltas computed from the default 1200, not from zero.
        assert_eq!(outcome.winner_old_rating, 1200);
        assert_eq!(outcome.loser_old_rating, 1200);
        assert_eq!(outcome.winner_new_rating, 1216);
        assert_eq!(outcome.loser_new_rating, 1184);
    }

    #[tokio::test]
    async fn assigned_rating_is_stable_without_matches() {
        let store = Arc::new(MemoryStore::new());
        let players = PlayerRepository::new(store.clone());
        seed_player(&store, "alice", None, None).await;

        let ladder = service(store.clone());
        ladder.ensure_rating(DIVISION.collection, "alice", None).await.unwrap();

        let assigned = players
            .find(DIVISION.collection, "alice")
            .await
            .unwrap()
            .unwrap()
            .elo_rating;
        assert_eq!(assigned, Some(1200));

        // A second pass sees the stored rating and leaves it untouched.
        let rating = ladder
            .ensure_rating(DIVISION.collection, "alice", assigned)
            .await
            .unwrap();
        assert_eq!(rating, 1200);
    }

    #[tokio::test]
    async fn winner_below_loser_swaps_positions() {
        let store = Arc::new(MemoryStore::new());
        seed_player(&store, "alice", Some(1100), Some(5)).await;
        seed_player(&store, "bob", Some(1500), Some(2)).await;

        let outcome = service(store.clone())
            .apply_match_result(&DIVISION, "alice", "bob")
            .await
            .unwrap();
        assert!(outcome.swapped);

        let players = PlayerRepository::new(store);
        let alice = players.find(DIVISION.collection, "alice").await.unwrap().unwrap();
        let bob = players.find(DIVISION.collection, "bob").await.unwrap().unwrap();
        assert_eq!(alice.position, Some(2));
        assert_eq!(bob.position, Some(5));
    }

    #[tokio::test]
    async fn winner_already_above_keeps_positions() {
        let store = Arc::new(MemoryStore::new());
        seed_player(&store, "alice", Some(1500), Some(2)).await;
        seed_player(&store, "bob", Some(1100), Some(5)).await;

        let outcome = service(store.clone())
            .apply_match_result(&DIVISION, "alice", "bob")
            .await
            .unwrap();
        assert!(!outcome.swapped);

        let players = PlayerRepository::new(store);
        let alice = players.find(DIVISION.collection, "alice").await.unwrap().unwrap();
        assert_eq!(alice.position, Some(2));
    }

    #[tokio::test]
    async fn missing_position_on_either_side_means_no_swap() {
        let store = Arc::new(MemoryStore::new());
        seed_player(&store, "alice", Some(1100), None).await;
        seed_player(&store, "bob", Some(1500), Some(2)).await;

        let outcome = service(store)
            .apply_match_result(&DIVISION, "alice", "bob")
            .await
            .unwrap();
        assert!(!outcome.swapped);
    }
}
