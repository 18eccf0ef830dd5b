use chrono::{DateTime, Utc};
use lead_spec::{ConflictColumn, ServiceType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Follow-up state of a lead, owned by the back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    Pending,
    Contacted,
    Closed,
}

/// Persisted shape of a submitted questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub service_type: ServiceType,
    pub form_data: Value,
    pub contact_name: String,
    pub contact_email: Option<String>,
    pub contact_phone: String,
    pub contact_postal_code: Option<String>,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LeadRecord {
    /// True when both records agree on every conflict column.
    /// An empty column list never matches.
    pub fn same_identity(&self, other: &LeadRecord, conflict: &[ConflictColumn]) -> bool {
        !conflict.is_empty()
            && conflict.iter().all(|column| match column {
                ConflictColumn::ServiceType => self.service_type == other.service_type,
                ConflictColumn::ContactPhone => self.contact_phone == other.contact_phone,
            })
    }
}

/// A record as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLead {
    pub id: Uuid,
    pub table: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub record: LeadRecord,
}
