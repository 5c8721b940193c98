use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use log::info;

use crate::config::settings::{AggregationSettings, LadderSettings, RatingSettings};
use crate::database::models::{LadderEntry, MemberRecord, PlayerRecord, UserProfile};
use crate::database::{MemberRepository, PlayerRepository, UserRepository};
use crate::errors::LadderError;
use crate::rating::Rank;
use crate::store::StoreError;

#[derive(Debug, Clone, Copy)]
pub struct RebuildSummary {
    pub members: usize,
    pub deleted: usize,
    pub batches: usize,
}

/// Rebuilds the denormalized member view from scratch: every division
/// roster plus the non-participant and profile collections are merged into
/// one aggregated record per user. Safe to re-run; each run deletes the
/// previous output before writing the new one.
#[derive(Clone)]
pub struct AggregationService {
    players: PlayerRepository,
    users: UserRepository,
    members: MemberRepository,
    ladder: LadderSettings,
    rating: RatingSettings,
    settings: AggregationSettings,
}

impl AggregationService {
    pub fn new(
        players: PlayerRepository,
        users: UserRepository,
        members: MemberRepository,
        ladder: LadderSettings,
        rating: RatingSettings,
        settings: AggregationSettings,
    ) -> Self {
        Self {
            players,
            users,
            members,
            ladder,
            rating,
            settings,
        }
    }

    pub async fn rebuild(&self) -> Result<RebuildSummary, LadderError> {
        self.rebuild_at(Utc::now()).await
    }

    pub async fn rebuild_at(&self, now: DateTime<Utc>) -> Result<RebuildSummary, LadderError> {
        self.run(now)
            .await
            .map_err(|source| LadderError::Aggregation { source })
    }

    async fn run(&self, now: DateTime<Utc>) -> Result<RebuildSummary, StoreError> {
        info!("Rebuilding member view across {} divisions", self.ladder.divisions.len());

        // All source collections are fetched concurrently.
        let (rosters, profiles, non_participants) = tokio::try_join!(
            try_join_all(
                self.ladder
                    .divisions
                    .iter()
                    .map(|division| self.players.list(division.collection)),
            ),
            self.users.profiles(),
            self.users.non_participants(),
        )?;

        let records = self.merge(rosters, profiles, non_participants, now);
        info!("  -> Merged {} members", records.len());

        let stale = self.members.ids().await?;
        let deleted = stale.len();
        for id in &stale {
            self.members.delete(id).await?;
        }
        info!("  -> Deleted {} stale member records", deleted);

        let mut batches = 0;
        for chunk in records.chunks(self.settings.batch_size.max(1)) {
            self.members.write_batch(chunk).await?;
            batches += 1;
        }
        info!("  -> Wrote {} member records in {} batches", records.len(), batches);

        Ok(RebuildSummary {
            members: records.len(),
            deleted,
            batches,
        })
    }

    fn merge(
        &self,
        rosters: Vec<Vec<(String, PlayerRecord)>>,
        profiles: Vec<(String, UserProfile)>,
        non_participants: Vec<(String, UserProfile)>,
        now: DateTime<Utc>,
    ) -> Vec<(String, MemberRecord)> {
        let mut merged: BTreeMap<String, MemberRecord> = BTreeMap::new();

        let blank = |username: String| MemberRecord {
            username,
            ladders: Vec::new(),
            primary_ladder: None,
            highest_elo: 0,
            rank: Rank::Unranked,
            is_non_participant: false,
            last_updated: now,
        };

        // Division order is the processing order; it also breaks elo ties.
        for (division, roster) in self.ladder.divisions.iter().zip(rosters) {
            for (id, player) in roster {
                let member = merged
                    .entry(id)
                    .or_insert_with(|| blank(player.username.clone()));
                member.ladders.push(LadderEntry {
                    ladder: division.key.to_string(),
                    elo: player.elo_rating.unwrap_or(self.rating.default_rating),
                    active: player.active,
                });
            }
        }

        for (id, profile) in non_participants {
            merged.entry(id).or_insert_with(|| blank(profile.username));
        }

        // Profiles override the display name but never add members.
        for (id, profile) in profiles {
            if let Some(member) = merged.get_mut(&id) {
                member.username = profile.username;
            }
        }

        for member in merged.values_mut() {
            let best = member
                .ladders
                .iter()
                .reduce(|best, entry| if entry.elo > best.elo { entry } else { best });
            if let Some(best) = best {
                member.primary_ladder = Some(best.ladder.clone());
                member.highest_elo = best.elo;
            }
            member.rank = Rank::for_rating(member.highest_elo);
            member.is_non_participant = member.ladders.is_empty();
        }

        merged.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::database::models::PlayerRecord;
    use crate::database::{MEMBERS, NON_PARTICIPANTS, USERS};
    use crate::store::{DocumentStore, MemoryStore};

    fn service(store: Arc<MemoryStore>) -> AggregationService {
        service_with_batch(store, AggregationSettings::default().batch_size)
    }

    fn service_with_batch(store: Arc<MemoryStore>, batch_size: usize) -> AggregationService {
        AggregationService::new(
            PlayerRepository::new(store.clone()),
            UserRepository::new(store.clone()),
            MemberRepository::new(store),
            LadderSettings::default(),
            RatingSettings::default(),
            AggregationSettings { batch_size },
        )
    }

    async fn seed_player(store: &Arc<MemoryStore>, collection: &str, id: &str, elo: i64) {
        let players = PlayerRepository::new(store.clone());
        let mut player = PlayerRecord::new(id.to_uppercase());
        player.elo_rating = Some(elo);
        players.save(collection, id, &player).await.unwrap();
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn merges_divisions_and_derives_rank() {
        let store = Arc::new(MemoryStore::new());
        seed_player(&store, "playersD1", "alice", 1650).await;
        seed_player(&store, "playersD2", "alice", 1700).await;
        seed_player(&store, "playersD2", "bob", 1450).await;

        let summary = service(store.clone()).rebuild_at(fixed_now()).await.unwrap();
        assert_eq!(summary.members, 2);

        let members = MemberRepository::new(store);
        let listed: std::collections::HashMap<_, _> =
            members.list().await.unwrap().into_iter().collect();

        let alice = &listed["alice"];
        assert_eq!(alice.ladders.len(), 2);
        assert_eq!(alice.primary_ladder.as_deref(), Some("d2"));
        assert_eq!(alice.highest_elo, 1700);
        assert_eq!(alice.rank, Rank::Silver);
        assert!(!alice.is_non_participant);

        let bob = &listed["bob"];
        assert_eq!(bob.rank, Rank::Bronze);
    }

    #[tokio::test]
    async fn elo_tie_keeps_earliest_division_as_primary() {
        let store = Arc::new(MemoryStore::new());
        seed_player(&store, "playersD1", "alice", 1500).await;
        seed_player(&store, "playersD3", "alice", 1500).await;

        service(store.clone()).rebuild_at(fixed_now()).await.unwrap();

        let members = MemberRepository::new(store);
        let (_, alice) = members.list().await.unwrap().remove(0);
        assert_eq!(alice.primary_ladder.as_deref(), Some("d1"));
    }

    #[tokio::test]
    async fn non_participant_only_user_is_included_unranked() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(NON_PARTICIPANTS, "carol", json!({"username": "Carol"}))
            .await
            .unwrap();

        service(store.clone()).rebuild_at(fixed_now()).await.unwrap();

        let members = MemberRepository::new(store);
        let (_, carol) = members.list().await.unwrap().remove(0);
        assert!(carol.ladders.is_empty());
        assert!(carol.is_non_participant);
        assert_eq!(carol.rank, Rank::Unranked);
        assert_eq!(carol.primary_ladder, None);
    }

    #[tokio::test]
    async fn profile_overrides_display_name() {
        let store = Arc::new(MemoryStore::new());
        seed_player(&store, "playersD1", "alice", 1500).await;
        store
            .set(USERS, "alice", json!({"username": "Alice Prime"}))
            .await
            .unwrap();

        service(store.clone()).rebuild_at(fixed_now()).await.unwrap();

        let members = MemberRepository::new(store);
        let (_, alice) = members.list().await.unwrap().remove(0);
        assert_eq!(alice.username, "Alice Prime");
    }

    #[tokio::test]
    async fn rebuild_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        seed_player(&store, "playersD1", "alice", 1650).await;
        seed_player(&store, "playersD2", "bob", 1450).await;
        store
            .set(NON_PARTICIPANTS, "carol", json!({"username": "Carol"}))
            .await
            .unwrap();

        let aggregator = service(store.clone());
        aggregator.rebuild_at(fixed_now()).await.unwrap();
        let first = store.query(MEMBERS).await.unwrap();

        aggregator.rebuild_at(fixed_now()).await.unwrap();
        let second = store.query(MEMBERS).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn stale_member_records_are_deleted() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(MEMBERS, "ghost", json!({"username": "Ghost", "ladders": [], "highestElo": 0, "rank": "unranked", "isNonParticipant": true, "lastUpdated": "2020-01-01T00:00:00Z"}))
            .await
            .unwrap();
        seed_player(&store, "playersD1", "alice", 1500).await;

        let summary = service(store.clone()).rebuild_at(fixed_now()).await.unwrap();
        assert_eq!(summary.deleted, 1);

        let members = MemberRepository::new(store);
        let ids: Vec<String> = members.ids().await.unwrap();
        assert_eq!(ids, ["alice"]);
    }

    #[tokio::test]
    async fn writes_are_chunked_to_the_batch_size() {
        let store = Arc::new(MemoryStore::new());
        for i in 0..7i64 {
            seed_player(&store, "playersD1", &format!("p{i}"), 1400 + i).await;
        }

        let summary = service_with_batch(store, 3)
            .rebuild_at(fixed_now())
            .await
            .unwrap();
        assert_eq!(summary.members, 7);
        assert_eq!(summary.batches, 3);
    }
}
