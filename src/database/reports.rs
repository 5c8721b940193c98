use std::sync::Arc;

use crate::store::{self, DocumentStore, StoreError};

use super::models::MatchReport;
use super::{APPROVED_REPORTS, PENDING_REPORTS};

#[derive(Clone)]
pub struct ReportRepository {
    store: Arc<dyn DocumentStore>,
}

impl ReportRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn insert_pending(&self, id: &str, report: &MatchReport) -> Result<(), StoreError> {
        let doc = store::encode(PENDING_REPORTS, id, report)?;
        self.store.set(PENDING_REPORTS, id, doc).await
    }

    pub async fn find_pending(&self, id: &str) -> Result<Option<MatchReport>, StoreError> {
        match self.store.get(PENDING_REPORTS, id).await? {
            Some(doc) => Ok(Some(store::decode(PENDING_REPORTS, id, doc)?)),
            None => Ok(None),
        }
    }

    /// Pending reports, oldest first.
    pub async fn pending(&self) -> Result<Vec<(String, MatchReport)>, StoreError> {
        let mut reports: Vec<(String, MatchReport)> = self
            .store
            .query(PENDING_REPORTS)
            .await?
            .into_iter()
            .map(|(id, doc)| {
                let report = store::decode(PENDING_REPORTS, &id, doc)?;
                Ok((id, report))
            })
            .collect::<Result<_, StoreError>>()?;

        reports.sort_by_key(|(_, report)| report.created_at);
        Ok(reports)
    }

    /// Move a confirmed report into the approved collection. The approved
    /// copy is written first so a failure between the two writes cannot
    /// lose the report.
    pub async fn approve(&self, id: &str, report: &MatchReport) -> Result<(), StoreError> {
        let mut approved = report.clone();
        approved.approved = true;

        let doc = store::encode(APPROVED_REPORTS, id, &approved)?;
        self.store.set(APPROVED_REPORTS, id, doc).await?;
        self.store.delete(PENDING_REPORTS, id).await
    }

    pub async fn approved(&self) -> Result<Vec<(String, MatchReport)>, StoreError> {
        self.store
            .query(APPROVED_REPORTS)
            .await?
            .into_iter()
            .map(|(id, doc)| {
                let report = store::decode(APPROVED_REPORTS, &id, doc)?;
                Ok((id, report))
            })
            .collect()
    }
}
