use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use lead_spec::{FieldStore, FormDataShape, QuestionnaireSpec, WritePolicy};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::record::{LeadRecord, LeadStatus, StoredLead};
use crate::store::{RecordStore, StoreError};

/// Language used for user-facing notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    Nl,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(Locale::Fr),
            "nl" => Ok(Locale::Nl),
            other => Err(format!("unsupported locale '{}'; expected fr or nl", other)),
        }
    }
}

impl Locale {
    /// Text of the confirmation screen shown after a stored lead.
    pub fn confirmation(&self) -> &'static str {
        match self {
            Locale::Fr => {
                "Merci ! Votre demande a bien été envoyée. Un conseiller vous recontactera rapidement."
            }
            Locale::Nl => {
                "Bedankt! Uw aanvraag is goed verzonden. Een adviseur neemt snel contact met u op."
            }
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Fr => f.write_str("fr"),
            Locale::Nl => f.write_str("nl"),
        }
    }
}

/// User-visible report of a failed submission. Always retryable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionNotice {
    pub questionnaire_id: String,
    pub retryable: bool,
    pub detail: String,
    pub locale: Locale,
}

impl SubmissionNotice {
    pub fn new(questionnaire_id: &str, error: &StoreError, locale: Locale) -> Self {
        Self {
            questionnaire_id: questionnaire_id.to_string(),
            retryable: true,
            detail: error.to_string(),
            locale,
        }
    }

    pub fn message(&self) -> &'static str {
        match self.locale {
            Locale::Fr => "Une erreur est survenue. Veuillez réessayer.",
            Locale::Nl => "Er is een fout opgetreden. Probeer het opnieuw.",
        }
    }
}

/// A lead ready to be written, detached from the instance that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub table: String,
    pub policy: WritePolicy,
    pub record: LeadRecord,
}

impl PendingSubmission {
    pub fn prepare(spec: &QuestionnaireSpec, fields: &FieldStore, now: DateTime<Utc>) -> Self {
        Self {
            table: spec.table.clone(),
            policy: spec.write_policy.clone(),
            record: build_record(spec, fields, now),
        }
    }

    /// Perform the write with the configured policy.
    pub async fn execute<S>(&self, store: &S) -> Result<StoredLead, StoreError>
    where
        S: RecordStore + ?Sized,
    {
        match &self.policy {
            WritePolicy::Insert => store.insert(&self.table, self.record.clone()).await,
            WritePolicy::Upsert { conflict } => {
                store
                    .upsert(&self.table, self.record.clone(), conflict)
                    .await
            }
        }
    }
}

/// Materialize the lead record for the current answers.
pub fn build_record(spec: &QuestionnaireSpec, fields: &FieldStore, now: DateTime<Utc>) -> LeadRecord {
    let contact = &spec.contact;
    let contact_name = contact
        .name
        .iter()
        .filter_map(|field_id| fields.text(field_id))
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let stamp = spec.write_policy.is_upsert() || spec.touch_updated_at;

    LeadRecord {
        service_type: spec.service_type,
        form_data: form_data(&spec.form_data, fields),
        contact_name,
        contact_email: optional_text(fields, contact.email.as_deref()),
        contact_phone: fields.text(&contact.phone).unwrap_or_default().to_string(),
        contact_postal_code: optional_text(fields, contact.postal_code.as_deref()),
        status: LeadStatus::Pending,
        updated_at: stamp.then_some(now),
    }
}

fn optional_text(fields: &FieldStore, field_id: Option<&str>) -> Option<String> {
    field_id
        .and_then(|id| fields.text(id))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn form_data(shape: &FormDataShape, fields: &FieldStore) -> Value {
    match shape {
        FormDataShape::Verbatim => fields.to_json(),
        FormDataShape::Labelled { fields: labelled } => {
            let map: Map<String, Value> = labelled
                .iter()
                .map(|entry| {
                    let value = match (fields.get(&entry.field), &entry.fallback) {
                        (Some(value), Some(fallback)) if value.is_empty() => {
                            Value::String(fallback.clone())
                        }
                        (Some(value), _) => value.to_json(),
                        (None, fallback) => fallback
                            .clone()
                            .map(Value::String)
                            .unwrap_or(Value::Null),
                    };
                    (entry.label.clone(), value)
                })
                .collect();
            Value::Object(map)
        }
    }
}
