use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input kinds supported by questionnaire fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text (address, phone, consumption...).
    #[default]
    Text,
    /// Single option picked from `choices`.
    Choice,
    /// Any number of options picked from `choices`; stored as a list.
    MultiChoice,
}

impl FieldKind {
    pub fn is_list(&self) -> bool {
        matches!(self, FieldKind::MultiChoice)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Choice => "choice",
            FieldKind::MultiChoice => "multi_choice",
        }
    }
}

/// One answer slot of a questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldSpec {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub kind: FieldKind,
    /// Options offered by the input. Presentation only: values are not checked against them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}
