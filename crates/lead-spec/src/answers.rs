use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::spec::{FieldKind, QuestionnaireSpec};

/// Current answer of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn empty_for(kind: FieldKind) -> Self {
        if kind.is_list() {
            FieldValue::List(Vec::new())
        } else {
            FieldValue::Text(String::new())
        }
    }

    /// Unanswered means a zero-length string or a list with no selection.
    /// Whitespace is an answer; format is never inspected.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            FieldValue::Text(_) => None,
        }
    }

    fn same_kind(&self, other: &FieldValue) -> bool {
        matches!(
            (self, other),
            (FieldValue::Text(_), FieldValue::Text(_)) | (FieldValue::List(_), FieldValue::List(_))
        )
    }

    fn cleared(&self) -> FieldValue {
        match self {
            FieldValue::Text(_) => FieldValue::Text(String::new()),
            FieldValue::List(_) => FieldValue::List(Vec::new()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }

    /// Display form used by text renderers: lists are comma-joined.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::List(items) => items.join(", "),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field '{0}' does not belong to this questionnaire")]
    UnknownField(String),
    #[error("field '{field}' expects a {expected} value")]
    KindMismatch {
        field: String,
        expected: &'static str,
    },
}

/// Answers of one questionnaire instance. The key set is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(transparent)]
pub struct FieldStore {
    values: BTreeMap<String, FieldValue>,
}

impl FieldStore {
    /// Every field of `spec`, unanswered.
    pub fn for_spec(spec: &QuestionnaireSpec) -> Self {
        let values = spec
            .fields
            .iter()
            .map(|field| (field.id.clone(), FieldValue::empty_for(field.kind)))
            .collect();
        Self { values }
    }

    pub fn get(&self, field_id: &str) -> Option<&FieldValue> {
        self.values.get(field_id)
    }

    /// Text value of a field; `None` for unknown or list fields.
    pub fn text(&self, field_id: &str) -> Option<&str> {
        self.get(field_id).and_then(FieldValue::as_text)
    }

    pub fn is_answered(&self, field_id: &str) -> bool {
        self.get(field_id).is_some_and(|value| !value.is_empty())
    }

    /// Overwrite a field, returning the previous value.
    pub fn set(
        &mut self,
        field_id: &str,
        value: FieldValue,
    ) -> Result<FieldValue, FieldError> {
        let slot = self
            .values
            .get_mut(field_id)
            .ok_or_else(|| FieldError::UnknownField(field_id.to_string()))?;
        if !slot.same_kind(&value) {
            return Err(FieldError::KindMismatch {
                field: field_id.to_string(),
                expected: match slot {
                    FieldValue::Text(_) => "text",
                    FieldValue::List(_) => "list",
                },
            });
        }
        Ok(std::mem::replace(slot, value))
    }

    /// Add `option` to a list field, or remove it when already selected.
    /// Returns whether the option is selected afterwards.
    pub fn toggle(&mut self, field_id: &str, option: &str) -> Result<bool, FieldError> {
        match self.values.get_mut(field_id) {
            None => Err(FieldError::UnknownField(field_id.to_string())),
            Some(FieldValue::Text(_)) => Err(FieldError::KindMismatch {
                field: field_id.to_string(),
                expected: "list",
            }),
            Some(FieldValue::List(items)) => {
                if let Some(position) = items.iter().position(|item| item == option) {
                    items.remove(position);
                    Ok(false)
                } else {
                    items.push(option.to_string());
                    Ok(true)
                }
            }
        }
    }

    /// Reset every field to unanswered, keeping the key set.
    pub fn clear(&mut self) {
        for value in self.values.values_mut() {
            *value = value.cleared();
        }
    }

    pub fn is_blank(&self) -> bool {
        self.values.values().all(FieldValue::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(id, value)| (id.as_str(), value))
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(id, value)| (id.clone(), value.to_json()))
            .collect();
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::spec::ServiceType;

    #[test]
    fn store_starts_blank_with_fixed_keys() {
        let spec = catalog::builtin(ServiceType::Telecom);
        let store = FieldStore::for_spec(&spec);
        assert!(store.is_blank());
        assert_eq!(store.get("services"), Some(&FieldValue::List(vec![])));
        assert_eq!(store.text("currentProvider"), Some(""));
        assert!(store.get("meterType").is_none());
    }

    #[test]
    fn set_rejects_unknown_and_mismatched_fields() {
        let spec = catalog::builtin(ServiceType::Telecom);
        let mut store = FieldStore::for_spec(&spec);
        assert_eq!(
            store.set("nope", "x".into()),
            Err(FieldError::UnknownField("nope".into()))
        );
        assert!(matches!(
            store.set("services", "Internet".into()),
            Err(FieldError::KindMismatch { .. })
        ));
        assert!(store.set("phone", "not a phone".into()).is_ok());
        assert!(store.is_answered("phone"));
    }

    #[test]
    fn whitespace_counts_as_an_answer() {
        assert!(!FieldValue::from(" ").is_empty());
        assert!(FieldValue::from("").is_empty());
        assert!(FieldValue::List(vec![]).is_empty());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let spec = catalog::builtin(ServiceType::Telecom);
        let mut store = FieldStore::for_spec(&spec);
        assert_eq!(store.toggle("services", "TV"), Ok(true));
        assert_eq!(store.toggle("services", "Mobile"), Ok(true));
        assert_eq!(store.toggle("services", "TV"), Ok(false));
        assert_eq!(
            store.get("services"),
            Some(&FieldValue::List(vec!["Mobile".into()]))
        );
        assert!(store.toggle("name", "TV").is_err());
    }

    #[test]
    fn clear_keeps_keys_and_kinds() {
        let spec = catalog::builtin(ServiceType::Telecom);
        let mut store = FieldStore::for_spec(&spec);
        store.set("name", "Durand".into()).unwrap();
        store.toggle("services", "TV").unwrap();
        store.clear();
        assert_eq!(store, FieldStore::for_spec(&spec));
    }
}
