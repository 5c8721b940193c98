use chrono::{DateTime, Utc};
use log::info;

use crate::config::settings::LadderSettings;
use crate::database::models::MatchReport;
use crate::database::ReportRepository;
use crate::errors::LadderError;
use crate::rating::Rank;

use super::ladder::{LadderService, MatchOutcome};
use super::promotion::PromotionService;

#[derive(Debug, Clone)]
pub struct NewReport {
    pub winner_id: String,
    pub loser_id: String,
    pub winner_username: String,
    pub loser_username: String,
    pub winner_score: i64,
    pub loser_score: i64,
    pub winner_suicides: i64,
    pub loser_suicides: i64,
    pub map: String,
    pub comments: String,
    pub ladder: String,
}

#[derive(Debug, Clone)]
pub struct ConfirmOutcome {
    pub outcome: MatchOutcome,
    pub winner_promotion: Option<Rank>,
    pub loser_promotion: Option<Rank>,
}

/// Match-report lifecycle: reports enter unapproved, and confirmation by
/// the opposing party applies the result to the ladder, runs the promotion
/// check for both players and moves the report to the approved collection.
#[derive(Clone)]
pub struct ReportService {
    reports: ReportRepository,
    ladder: LadderService,
    promotions: PromotionService,
    divisions: LadderSettings,
}

impl ReportService {
    pub fn new(
        reports: ReportRepository,
        ladder: LadderService,
        promotions: PromotionService,
        divisions: LadderSettings,
    ) -> Self {
        Self {
            reports,
            ladder,
            promotions,
            divisions,
        }
    }

    pub async fn submit(&self, report: NewReport) -> Result<String, LadderError> {
        self.submit_at(report, Utc::now()).await
    }

    pub async fn submit_at(
        &self,
        report: NewReport,
        now: DateTime<Utc>,
    ) -> Result<String, LadderError> {
        if self.divisions.division(&report.ladder).is_none() {
            return Err(LadderError::UnknownDivision(report.ladder));
        }

        let record = MatchReport {
            winner_id: report.winner_id,
            loser_id: report.loser_id,
            winner_username: report.winner_username,
            loser_username: report.loser_username,
            winner_score: report.winner_score,
            loser_score: report.loser_score,
            winner_suicides: report.winner_suicides,
            loser_suicides: report.loser_suicides,
            map: report.map,
            comments: report.comments,
            ladder: report.ladder,
            approved: false,
            created_at: now,
        };
        let id = format!(
            "{}-{}-{}",
            now.timestamp_millis(),
            record.winner_id,
            record.loser_id
        );

        self.reports.insert_pending(&id, &record).await?;
        info!(
            "Report {} submitted: {} beat {} on {}",
            id, record.winner_username, record.loser_username, record.ladder
        );
        Ok(id)
    }

    pub async fn pending(&self) -> Result<Vec<(String, MatchReport)>, LadderError> {
        Ok(self.reports.pending().await?)
    }

    pub async fn confirm(&self, id: &str) -> Result<ConfirmOutcome, LadderError> {
        let report = self
            .reports
            .find_pending(id)
            .await?
            .ok_or_else(|| LadderError::ReportNotFound(id.to_string()))?;
        let division = self
            .divisions
            .division(&report.ladder)
            .ok_or_else(|| LadderError::UnknownDivision(report.ladder.clone()))?;

        let outcome = self
            .ladder
            .apply_match_result(division, &report.winner_id, &report.loser_id)
            .await?;

        let winner_promotion = self
            .promotions
            .check_and_record(
                division,
                &report.winner_id,
                outcome.winner_new_rating,
                outcome.winner_old_rating,
            )
            .await?;
        let loser_promotion = self
            .promotions
            .check_and_record(
                division,
                &report.loser_id,
                outcome.loser_new_rating,
                outcome.loser_old_rating,
            )
            .await?;

        self.reports.approve(id, &report).await?;
        info!("Report {} confirmed and approved", id);

        Ok(ConfirmOutcome {
            outcome,
            winner_promotion,
            loser_promotion,
        })
    }
}
