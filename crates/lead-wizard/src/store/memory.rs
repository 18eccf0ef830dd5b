use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use lead_spec::ConflictColumn;
use tokio::sync::Mutex;

use super::{RecordStore, StoreError, Tables};
use crate::record::{LeadRecord, StoredLead};

/// Process-local store. Failures can be queued to exercise retry paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    pending_failures: AtomicUsize,
    attempts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` writes fail with `StoreError::Unavailable`.
    pub fn fail_next(&self, count: usize) {
        self.pending_failures.store(count, Ordering::SeqCst);
    }

    /// Number of write calls received, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> Tables {
        self.tables.lock().await.clone()
    }

    fn check_failure(&self) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let injected = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok();
        if injected {
            Err(StoreError::Unavailable("injected failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, table: &str, record: LeadRecord) -> Result<StoredLead, StoreError> {
        self.check_failure()?;
        let mut tables = self.tables.lock().await;
        Ok(tables.insert(table, record, Utc::now()))
    }

    async fn upsert(
        &self,
        table: &str,
        record: LeadRecord,
        conflict: &[ConflictColumn],
    ) -> Result<StoredLead, StoreError> {
        self.check_failure()?;
        let mut tables = self.tables.lock().await;
        Ok(tables.upsert(table, record, conflict, Utc::now()))
    }

    async fn list(&self, table: &str) -> Result<Vec<StoredLead>, StoreError> {
        Ok(self.tables.lock().await.rows(table))
    }

    async fn table_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.tables.lock().await.names())
    }
}
