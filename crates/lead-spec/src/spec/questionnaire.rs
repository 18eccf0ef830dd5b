use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::field::FieldSpec;
use crate::spec::step::StepSpec;

/// Business line a lead belongs to. Serialized with the names the lead table uses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum ServiceType {
    #[serde(rename = "energie")]
    Energy,
    #[serde(rename = "solaire")]
    Solar,
    #[serde(rename = "telecom")]
    Telecom,
    #[serde(rename = "callback")]
    GenericCallback,
    #[serde(rename = "job")]
    JobApplication,
}

impl ServiceType {
    pub const ALL: [ServiceType; 5] = [
        ServiceType::Energy,
        ServiceType::Solar,
        ServiceType::Telecom,
        ServiceType::GenericCallback,
        ServiceType::JobApplication,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Energy => "energie",
            ServiceType::Solar => "solaire",
            ServiceType::Telecom => "telecom",
            ServiceType::GenericCallback => "callback",
            ServiceType::JobApplication => "job",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ServiceType::ALL
            .into_iter()
            .find(|service| service.as_str() == value)
            .ok_or_else(|| {
                format!(
                    "unknown service '{}'; expected one of energie, solaire, telecom, callback, job",
                    value
                )
            })
    }
}

/// Record columns that identify a lead for upserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConflictColumn {
    ServiceType,
    ContactPhone,
}

fn default_conflict() -> Vec<ConflictColumn> {
    vec![ConflictColumn::ServiceType, ConflictColumn::ContactPhone]
}

/// How a completed questionnaire is written to the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WritePolicy {
    /// Every submission creates a new record.
    #[default]
    Insert,
    /// A submission matching an existing record on `conflict` overwrites it.
    Upsert {
        #[serde(default = "default_conflict")]
        conflict: Vec<ConflictColumn>,
    },
}

impl WritePolicy {
    pub fn upsert_by_identity() -> Self {
        WritePolicy::Upsert {
            conflict: default_conflict(),
        }
    }

    pub fn is_upsert(&self) -> bool {
        matches!(self, WritePolicy::Upsert { .. })
    }
}

/// Which fields feed the dedicated contact columns of a lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContactMapping {
    /// Joined with a single space, skipping empty values.
    pub name: Vec<String>,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl ContactMapping {
    pub fn referenced_fields(&self) -> impl Iterator<Item = &str> {
        self.name
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.phone.as_str()))
            .chain(self.email.as_deref())
            .chain(self.postal_code.as_deref())
    }
}

/// A field re-exposed under a display label in the persisted form data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LabelledField {
    pub field: String,
    pub label: String,
    /// Stored instead of an empty value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

/// Shape of the `form_data` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum FormDataShape {
    /// The whole field store, keyed by field id.
    #[default]
    Verbatim,
    /// Only the listed fields, keyed by their labels.
    Labelled { fields: Vec<LabelledField> },
}

/// Top-level questionnaire definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionnaireSpec {
    pub id: String,
    pub title: String,
    pub service_type: ServiceType,
    /// Target collection in the record store.
    pub table: String,
    #[serde(default)]
    pub write_policy: WritePolicy,
    pub fields: Vec<FieldSpec>,
    pub steps: Vec<StepSpec>,
    pub contact: ContactMapping,
    #[serde(default)]
    pub form_data: FormDataShape,
    /// Stamp `updated_at` on every write, not only on upserts.
    #[serde(default)]
    pub touch_updated_at: bool,
}

impl QuestionnaireSpec {
    pub fn field(&self, id: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn step(&self, index: usize) -> Option<&StepSpec> {
        self.steps.get(index)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn last_step_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn is_last_step(&self, index: usize) -> bool {
        index == self.last_step_index()
    }
}
