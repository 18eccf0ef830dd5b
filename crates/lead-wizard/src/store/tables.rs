use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use lead_spec::ConflictColumn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{LeadRecord, StoredLead};

/// In-memory image of every table, shared by the store implementations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tables {
    tables: BTreeMap<String, Vec<StoredLead>>,
}

impl Tables {
    pub fn insert(&mut self, table: &str, record: LeadRecord, now: DateTime<Utc>) -> StoredLead {
        let stored = StoredLead {
            id: Uuid::new_v4(),
            table: table.to_string(),
            created_at: now,
            updated_at: record.updated_at.unwrap_or(now),
            record,
        };
        self.tables
            .entry(table.to_string())
            .or_default()
            .push(stored.clone());
        stored
    }

    pub fn upsert(
        &mut self,
        table: &str,
        record: LeadRecord,
        conflict: &[ConflictColumn],
        now: DateTime<Utc>,
    ) -> StoredLead {
        let rows = self.tables.entry(table.to_string()).or_default();
        if let Some(existing) = rows
            .iter_mut()
            .find(|row| row.record.same_identity(&record, conflict))
        {
            existing.updated_at = record.updated_at.unwrap_or(now);
            existing.record = record;
            return existing.clone();
        }
        self.insert(table, record, now)
    }

    pub fn rows(&self, table: &str) -> Vec<StoredLead> {
        self.tables.get(table).cloned().unwrap_or_default()
    }

    /// Names of every table holding at least one row.
    pub fn names(&self) -> Vec<String> {
        self.tables
            .iter()
            .filter(|(_, rows)| !rows.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn len(&self, table: &str) -> usize {
        self.tables.get(table).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(Vec::is_empty)
    }
}
