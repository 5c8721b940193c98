use std::sync::Arc;

use crate::store::{self, DocumentStore, StoreError};

use super::models::PromotionRecord;
use super::PROMOTIONS;

#[derive(Clone)]
pub struct PromotionRepository {
    store: Arc<dyn DocumentStore>,
}

impl PromotionRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Append one history record. The collection is append-only; records are
    /// never updated after the fact.
    pub async fn append(&self, id: &str, record: &PromotionRecord) -> Result<(), StoreError> {
        let doc = store::encode(PROMOTIONS, id, record)?;
        self.store.set(PROMOTIONS, id, doc).await
    }

    pub async fn list(&self) -> Result<Vec<(String, PromotionRecord)>, StoreError> {
        self.store
            .query(PROMOTIONS)
            .await?
            .into_iter()
            .map(|(id, doc)| {
                let record = store::decode(PROMOTIONS, &id, doc)?;
                Ok((id, record))
            })
            .collect()
    }

    pub async fn history_for(&self, user_id: &str) -> Result<Vec<PromotionRecord>, StoreError> {
        let mut history: Vec<PromotionRecord> = self
            .list()
            .await?
            .into_iter()
            .map(|(_, record)| record)
            .filter(|record| record.user_id == user_id)
            .collect();

        history.sort_by_key(|record| record.timestamp);
        Ok(history)
    }
}
