use std::sync::Arc;

use crate::store::{self, DocumentStore, StoreError};

use super::models::UserProfile;
use super::{NON_PARTICIPANTS, USERS};

#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn profiles(&self) -> Result<Vec<(String, UserProfile)>, StoreError> {
        self.collect(USERS).await
    }

    pub async fn non_participants(&self) -> Result<Vec<(String, UserProfile)>, StoreError> {
        self.collect(NON_PARTICIPANTS).await
    }

    async fn collect(&self, collection: &str) -> Result<Vec<(String, UserProfile)>, StoreError> {
        self.store
            .query(collection)
            .await?
            .into_iter()
            .map(|(id, doc)| {
                let profile = store::decode(collection, &id, doc)?;
                Ok((id, profile))
            })
            .collect()
    }
}
