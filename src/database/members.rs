use std::sync::Arc;

use crate::store::{self, Document, DocumentStore, StoreError};

use super::models::MemberRecord;
use super::MEMBERS;

#[derive(Clone)]
pub struct MemberRepository {
    store: Arc<dyn DocumentStore>,
}

impl MemberRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .store
            .query(MEMBERS)
            .await?
            .into_iter()
            .map(|(id, _)| id)
            .collect())
    }

    pub async fn list(&self) -> Result<Vec<(String, MemberRecord)>, StoreError> {
        self.store
            .query(MEMBERS)
            .await?
            .into_iter()
            .map(|(id, doc)| {
                let member = store::decode(MEMBERS, &id, doc)?;
                Ok((id, member))
            })
            .collect()
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(MEMBERS, id).await
    }

    pub async fn write_batch(&self, members: &[(String, MemberRecord)]) -> Result<(), StoreError> {
        let docs: Vec<(String, Document)> = members
            .iter()
            .map(|(id, member)| {
                let doc = store::encode(MEMBERS, id, member)?;
                Ok((id.clone(), doc))
            })
            .collect::<Result<_, StoreError>>()?;

        self.store.batch_write(MEMBERS, docs).await
    }
}
