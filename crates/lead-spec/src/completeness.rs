use serde::Serialize;

use crate::answers::FieldStore;
use crate::spec::{QuestionnaireSpec, StepSpec};

/// Outcome of checking a step's required fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepCompleteness {
    pub complete: bool,
    pub missing: Vec<String>,
}

/// A step is complete iff every required field holds a non-empty value.
pub fn step_completeness(step: &StepSpec, fields: &FieldStore) -> StepCompleteness {
    let missing: Vec<String> = step
        .required
        .iter()
        .filter(|field_id| !fields.is_answered(field_id))
        .cloned()
        .collect();

    StepCompleteness {
        complete: missing.is_empty(),
        missing,
    }
}

/// Completeness of the step at `index`; an out-of-range index is never complete.
pub fn completeness_at(
    spec: &QuestionnaireSpec,
    index: usize,
    fields: &FieldStore,
) -> StepCompleteness {
    match spec.step(index) {
        Some(step) => step_completeness(step, fields),
        None => StepCompleteness {
            complete: false,
            missing: Vec::new(),
        },
    }
}

/// Index of the first step whose required fields are not all answered.
pub fn first_incomplete_step(spec: &QuestionnaireSpec, fields: &FieldStore) -> Option<usize> {
    spec.steps
        .iter()
        .position(|step| !step_completeness(step, fields).complete)
}
