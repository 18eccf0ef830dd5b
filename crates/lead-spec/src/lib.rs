#![allow(missing_docs)]

pub mod answers;
pub mod catalog;
pub mod completeness;
pub mod render;
pub mod schema;
pub mod spec;
pub mod state;
pub mod validate;

pub use answers::{FieldError, FieldStore, FieldValue};
pub use catalog::CatalogError;
pub use completeness::{StepCompleteness, completeness_at, first_incomplete_step, step_completeness};
pub use render::{
    NextAction, RenderField, RenderPayload, build_render_payload, render_json_ui, render_text,
};
pub use schema::questionnaire_schema;
pub use spec::{
    ConflictColumn, ContactMapping, FieldKind, FieldSpec, FormDataShape, LabelledField,
    QuestionnaireSpec, ServiceType, StepSpec, WritePolicy,
};
pub use state::SubmissionState;
pub use validate::{SpecIssue, SpecReport, validate_spec};
