use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use lead_spec::ConflictColumn;
use tokio::sync::Mutex;
use tracing::debug;

use super::{RecordStore, StoreError, Tables};
use crate::record::{LeadRecord, StoredLead};

/// Store backed by a single JSON document holding every table.
///
/// Each write reloads the file, applies the change, and replaces the file
/// through a temporary sibling so a crash never leaves a half-written store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Tables, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Tables::default()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Tables::default()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    async fn save(&self, tables: &Tables) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }
        let bytes = serde_json::to_vec_pretty(tables).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, bytes)
            .await
            .map_err(|source| self.io_error(source))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|source| self.io_error(source))?;
        debug!(path = %self.path.display(), "lead store saved");
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn insert(&self, table: &str, record: LeadRecord) -> Result<StoredLead, StoreError> {
        let _guard = self.lock.lock().await;
        let mut tables = self.load().await?;
        let stored = tables.insert(table, record, Utc::now());
        self.save(&tables).await?;
        Ok(stored)
    }

    async fn upsert(
        &self,
        table: &str,
        record: LeadRecord,
        conflict: &[ConflictColumn],
    ) -> Result<StoredLead, StoreError> {
        let _guard = self.lock.lock().await;
        let mut tables = self.load().await?;
        let stored = tables.upsert(table, record, conflict, Utc::now());
        self.save(&tables).await?;
        Ok(stored)
    }

    async fn list(&self, table: &str) -> Result<Vec<StoredLead>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.rows(table))
    }

    async fn table_names(&self) -> Result<Vec<String>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.names())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LeadStatus;
    use lead_spec::ServiceType;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(phone: &str) -> LeadRecord {
        LeadRecord {
            service_type: ServiceType::GenericCallback,
            form_data: json!({ "name": "Girard" }),
            contact_name: "Girard".into(),
            contact_email: Some("girard@example.fr".into()),
            contact_phone: phone.into(),
            contact_postal_code: None,
            status: LeadStatus::Pending,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn records_survive_a_new_handle() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("leads.json");
        let store = JsonFileStore::new(&path);
        store.insert("callback_requests", record("0102")).await.unwrap();
        store
            .upsert(
                "callback_requests",
                record("0102"),
                &[ConflictColumn::ContactPhone],
            )
            .await
            .unwrap();

        let reopened = JsonFileStore::new(&path);
        let rows = reopened.list("callback_requests").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.contact_email.as_deref(), Some("girard@example.fr"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn missing_file_lists_nothing() {
        let dir = TempDir::new().expect("temp dir");
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.list("quote_requests").await.unwrap().is_empty());
        assert!(store.table_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn table_names_include_custom_tables() {
        let dir = TempDir::new().expect("temp dir");
        let store = JsonFileStore::new(dir.path().join("leads.json"));
        store.insert("salon_2025", record("0102")).await.unwrap();
        store.insert("callback_requests", record("0103")).await.unwrap();
        assert_eq!(
            store.table_names().await.unwrap(),
            vec!["callback_requests".to_string(), "salon_2025".to_string()]
        );
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("leads.json");
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(&path);
        let err = store.insert("quote_requests", record("0102")).await;
        assert!(matches!(err, Err(StoreError::Corrupt { .. })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
    }
}
