pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod errors;
pub mod rating;
pub mod services;
pub mod store;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::database::{MemberRepository, PlayerRepository, PromotionRepository, UserRepository};
use crate::errors::LadderError;
use crate::services::aggregation::AggregationService;
use crate::services::ladder::LadderService;
use crate::services::promotion::PromotionService;
use crate::services::server::ServerService;
use crate::store::{DocumentStore, SqliteStore};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_report(ladder: &str, winner_id: &str, loser_id: &str) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let store = open_store()?;

        let division = config
            .ladder
            .division(ladder)
            .ok_or_else(|| LadderError::UnknownDivision(ladder.to_string()))?;

        let players = PlayerRepository::new(store.clone());
        let ladder_service = LadderService::new(players.clone(), config.rating.clone());
        let promotions = PromotionService::new(
            players,
            PromotionRepository::new(store),
            config.rating.promotion_policy,
        );

        let outcome = ladder_service
            .apply_match_result(division, winner_id, loser_id)
            .await?;
        let winner_promotion = promotions
            .check_and_record(
                division,
                winner_id,
                outcome.winner_new_rating,
                outcome.winner_old_rating,
            )
            .await?;
        promotions
            .check_and_record(
                division,
                loser_id,
                outcome.loser_new_rating,
                outcome.loser_old_rating,
            )
            .await?;

        println!(
            "{}: {} -> {}",
            winner_id, outcome.winner_old_rating, outcome.winner_new_rating
        );
        println!(
            "{}: {} -> {}",
            loser_id, outcome.loser_old_rating, outcome.loser_new_rating
        );
        if outcome.swapped {
            println!("Ladder positions swapped");
        }
        if let Some(rank) = winner_promotion {
            println!("{} promoted to {}", winner_id, rank);
        }
        Ok(())
    })
}

pub fn handle_rebuild() -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let store = open_store()?;

        let players = PlayerRepository::new(store.clone());
        let service = AggregationService::new(
            players,
            UserRepository::new(store.clone()),
            MemberRepository::new(store),
            config.ladder,
            config.rating,
            config.aggregation,
        );

        let summary = service.rebuild().await?;
        println!(
            "Rebuilt {} member records ({} stale deleted, {} batches)",
            summary.members, summary.deleted, summary.batches
        );
        Ok(())
    })
}

fn open_store() -> Result<Arc<dyn DocumentStore>> {
    let db_path =
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| "arena_ladder.db".to_string());
    Ok(Arc::new(SqliteStore::open(&db_path)?))
}
