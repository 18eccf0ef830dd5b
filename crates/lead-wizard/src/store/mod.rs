use std::path::PathBuf;

use async_trait::async_trait;
use lead_spec::ConflictColumn;
use thiserror::Error;

use crate::record::{LeadRecord, StoredLead};

mod file;
mod memory;
mod tables;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use tables::Tables;

/// Error enumeration for record store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("record store rejected the write: {0}")]
    Rejected(String),
    #[error("failed to access store file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store file {path} is corrupt")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Write interface of the external lead store.
///
/// Both writes are safe to retry after a reported failure: a failed call
/// leaves the store unchanged.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Append a new record to `table`.
    async fn insert(&self, table: &str, record: LeadRecord) -> Result<StoredLead, StoreError>;

    /// Overwrite the record of `table` matching `record` on `conflict`, or append it.
    async fn upsert(
        &self,
        table: &str,
        record: LeadRecord,
        conflict: &[ConflictColumn],
    ) -> Result<StoredLead, StoreError>;

    /// Every record of `table`, oldest first.
    async fn list(&self, table: &str) -> Result<Vec<StoredLead>, StoreError>;

    /// Tables that hold records, in name order.
    async fn table_names(&self) -> Result<Vec<String>, StoreError>;
}
