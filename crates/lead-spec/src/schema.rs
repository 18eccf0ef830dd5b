use serde_json::Value;

use crate::spec::QuestionnaireSpec;

/// JSON schema describing questionnaire definition files.
pub fn questionnaire_schema() -> Value {
    schemars::schema_for!(QuestionnaireSpec).to_value()
}
