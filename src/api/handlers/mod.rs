use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::database::{
    MemberRepository, PlayerRepository, PromotionRepository, ReportRepository, UserRepository,
};
use crate::services::aggregation::AggregationService;
use crate::services::ladder::LadderService;
use crate::services::promotion::PromotionService;
use crate::services::reports::ReportService;
use crate::store::DocumentStore;

pub mod admin;
pub mod ladder;
pub mod reports;

pub struct AppState {
    pub players: PlayerRepository,
    pub members: MemberRepository,
    pub reports: ReportService,
    pub aggregation: AggregationService,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: AppConfig) -> Self {
        let players = PlayerRepository::new(store.clone());
        let members = MemberRepository::new(store.clone());

        let ladder = LadderService::new(players.clone(), config.rating.clone());
        let promotions = PromotionService::new(
            players.clone(),
            PromotionRepository::new(store.clone()),
            config.rating.promotion_policy,
        );
        let reports = ReportService::new(
            ReportRepository::new(store.clone()),
            ladder,
            promotions,
            config.ladder.clone(),
        );
        let aggregation = AggregationService::new(
            players.clone(),
            UserRepository::new(store),
            members.clone(),
            config.ladder.clone(),
            config.rating.clone(),
            config.aggregation.clone(),
        );

        Self {
            players,
            members,
            reports,
            aggregation,
            config,
        }
    }
}
