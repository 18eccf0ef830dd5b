use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One screen of a questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StepSpec {
    pub id: String,
    pub title: String,
    /// Fields collected on this step, in display order.
    pub fields: Vec<String>,
    /// Fields that must be non-empty before the step can be left forward.
    #[serde(default)]
    pub required: Vec<String>,
}

impl StepSpec {
    pub fn is_required(&self, field_id: &str) -> bool {
        self.required.iter().any(|id| id == field_id)
    }
}
