/*
 * Responsibility
 * - process-local user store for development and tests
 * - keyed by the exact email; concurrent readers share a read lock
 * - optional JSON seed file: an array of user records
 */
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::repos::error::{RepoError, RepoResult};
use crate::services::auth::principal::UserRecord;
use crate::services::auth::provider::UserRecordProvider;

#[derive(Clone, Debug, Default)]
pub struct InMemoryUserRepo {
    records: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.email.clone(), r))
            .collect::<HashMap<_, _>>();

        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Load records from a JSON array file.
    ///
    /// A later entry with the same email replaces an earlier one.
    pub async fn from_seed_file(path: impl AsRef<Path>) -> RepoResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RepoError::Seed(format!("{}: {e}", path.display())))?;

        let records: Vec<UserRecord> = serde_json::from_str(&raw)
            .map_err(|e| RepoError::Seed(format!("{}: {e}", path.display())))?;

        Ok(Self::with_records(records))
    }

    /// Insert or replace the record stored under its email.
    pub async fn insert(&self, record: UserRecord) {
        self.records
            .write()
            .await
            .insert(record.email.clone(), record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl UserRecordProvider for InMemoryUserRepo {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find_by_identifier(&self, identifier: &str) -> RepoResult<Option<UserRecord>> {
        Ok(self.records.read().await.get(identifier).cloned())
    }
}
