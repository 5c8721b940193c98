use std::sync::Arc;

use serde_json::json;

use crate::store::{self, DocumentStore, StoreError};

use super::models::PlayerRecord;

#[derive(Clone)]
pub struct PlayerRepository {
    store: Arc<dyn DocumentStore>,
}

impl PlayerRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn find(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<PlayerRecord>, StoreError> {
        match self.store.get(collection, id).await? {
            Some(doc) => Ok(Some(store::decode(collection, id, doc)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, collection: &str) -> Result<Vec<(String, PlayerRecord)>, StoreError> {
        self.store
            .query(collection)
            .await?
            .into_iter()
            .map(|(id, doc)| {
                let player = store::decode(collection, &id, doc)?;
                Ok((id, player))
            })
            .collect()
    }

    pub async fn save(
        &self,
        collection: &str,
        id: &str,
        player: &PlayerRecord,
    ) -> Result<(), StoreError> {
        let doc = store::encode(collection, id, player)?;
        self.store.set(collection, id, doc).await
    }

    pub async fn set_rating(
        &self,
        collection: &str,
        id: &str,
        rating: i64,
    ) -> Result<(), StoreError> {
        self.store
            .merge(collection, id, json!({ "eloRating": rating }))
            .await
    }

    pub async fn set_position(
        &self,
        collection: &str,
        id: &str,
        position: i64,
    ) -> Result<(), StoreError> {
        self.store
            .merge(collection, id, json!({ "position": position }))
            .await
    }

    pub async fn set_promotion_watermark(
        &self,
        collection: &str,
        id: &str,
        watermark: i64,
    ) -> Result<(), StoreError> {
        self.store
            .merge(collection, id, json!({ "lastShownPromotion": watermark }))
            .await
    }
}
