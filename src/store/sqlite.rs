use async_trait::async_trait;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use serde_json::Value;

use super::{Document, DocumentStore, StoreError, MAX_BATCH_SIZE};

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

/// Document store persisted in a single sqlite table keyed by
/// (collection, id), with the fields held as JSON text.
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn open(database_path: &str) -> Result<Self, StoreError> {
        let manager = SqliteConnectionManager::file(database_path);
        Self::from_manager(manager, None)
    }

    /// Private in-memory database, used by tests. The pool is capped at one
    /// connection so every caller sees the same database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_manager(SqliteConnectionManager::memory(), Some(1))
    }

    fn from_manager(
        manager: SqliteConnectionManager,
        max_size: Option<u32>,
    ) -> Result<Self, StoreError> {
        let mut builder = r2d2::Pool::builder();
        if let Some(size) = max_size {
            builder = builder.max_size(size);
        }
        let pool = builder.build(manager).map_err(backend_error)?;

        let store = Self { pool };
        store.apply_schema()?;
        Ok(store)
    }

    fn apply_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let schema_sql = include_str!("schema.sql");
        for statement in schema_sql.split(';') {
            let statement = statement.trim();
            if !statement.is_empty() {
                conn.execute(statement, []).map_err(backend_error)?;
            }
        }
        Ok(())
    }

    fn conn(&self) -> Result<DbConn, StoreError> {
        self.pool.get().map_err(backend_error)
    }
}

fn backend_error<E: std::fmt::Display>(err: E) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn parse_fields(collection: &str, id: &str, fields: String) -> Result<Document, StoreError> {
    serde_json::from_str(&fields).map_err(|source| StoreError::Decode {
        collection: collection.to_string(),
        id: id.to_string(),
        source,
    })
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let conn = self.conn()?;
        let fields: Option<String> = conn
            .query_row(
                "SELECT fields FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()
            .map_err(backend_error)?;

        fields
            .map(|raw| parse_fields(collection, id, raw))
            .transpose()
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO documents (collection, id, fields) VALUES (?1, ?2, ?3)",
            params![collection, id, doc.to_string()],
        )
        .map_err(backend_error)?;
        Ok(())
    }

    async fn merge(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError> {
        let Value::Object(fields) = fields else {
            return Err(StoreError::Backend(format!(
                "merge into {collection}/{id} requires an object document"
            )));
        };

        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(backend_error)?;

        let existing: Option<String> = tx
            .query_row(
                "SELECT fields FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()
            .map_err(backend_error)?;

        let mut doc = match existing {
            Some(raw) => parse_fields(collection, id, raw)?,
            None => Value::Object(Default::default()),
        };
        let Value::Object(existing) = &mut doc else {
            return Err(StoreError::Backend(format!(
                "document {collection}/{id} is not an object"
            )));
        };
        for (key, value) in fields {
            existing.insert(key, value);
        }

        tx.execute(
            "INSERT OR REPLACE INTO documents (collection, id, fields) VALUES (?1, ?2, ?3)",
            params![collection, id, doc.to_string()],
        )
        .map_err(backend_error)?;
        tx.commit().map_err(backend_error)
    }

    async fn query(&self, collection: &str) -> Result<Vec<(String, Document)>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT id, fields FROM documents WHERE collection = ?1 ORDER BY id")
            .map_err(backend_error)?;

        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(backend_error)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(backend_error)?;

        rows.into_iter()
            .map(|(id, raw)| {
                let doc = parse_fields(collection, &id, raw)?;
                Ok((id, doc))
            })
            .collect()
    }

    async fn batch_write(
        &self,
        collection: &str,
        docs: Vec<(String, Document)>,
    ) -> Result<(), StoreError> {
        if docs.len() > MAX_BATCH_SIZE {
            return Err(StoreError::BatchTooLarge(docs.len()));
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(backend_error)?;
        for (id, doc) in docs {
            tx.execute(
                "INSERT OR REPLACE INTO documents (collection, id, fields) VALUES (?1, ?2, ?3)",
                params![collection, id, doc.to_string()],
            )
            .map_err(backend_error)?;
        }
        tx.commit().map_err(backend_error)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
        )
        .map_err(backend_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_get_merge_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .set("players", "p1", json!({"username": "kira", "eloRating": 1200}))
            .await
            .unwrap();
        store
            .merge("players", "p1", json!({"eloRating": 1216}))
            .await
            .unwrap();

        let doc = store.get("players", "p1").await.unwrap().unwrap();
        assert_eq!(doc["username"], "kira");
        assert_eq!(doc["eloRating"], 1216);
    }

    #[tokio::test]
    async fn query_orders_by_id_within_collection() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("players", "b", json!({"n": 2})).await.unwrap();
        store.set("players", "a", json!({"n": 1})).await.unwrap();
        store.set("users", "z", json!({})).await.unwrap();

        let docs = store.query("players").await.unwrap();
        let ids: Vec<&str> = docs.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[tokio::test]
    async fn batch_write_and_delete() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .batch_write(
                "members",
                vec![
                    ("m1".to_string(), json!({"rank": "bronze"})),
                    ("m2".to_string(), json!({"rank": "gold"})),
                ],
            )
            .await
            .unwrap();
        assert_eq!(store.query("members").await.unwrap().len(), 2);

        store.delete("members", "m1").await.unwrap();
        assert_eq!(store.query("members").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn oversized_batch_is_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        let docs: Vec<_> = (0..=MAX_BATCH_SIZE)
            .map(|i| (format!("m{i}"), json!({})))
            .collect();
        let err = store.batch_write("members", docs).await.unwrap_err();
        assert!(matches!(err, StoreError::BatchTooLarge(_)));
    }
}
