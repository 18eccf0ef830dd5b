use std::sync::Arc;

use lead_spec::{FieldStore, QuestionnaireSpec, SubmissionState, validate_spec};

use crate::error::WizardError;

/// Answers and progress of one open questionnaire dialog.
#[derive(Debug, Clone)]
pub struct QuestionnaireInstance {
    spec: Arc<QuestionnaireSpec>,
    fields: FieldStore,
    current_step: usize,
    submission: SubmissionState,
}

impl QuestionnaireInstance {
    /// Fresh instance; refuses definitions that fail structural validation.
    pub fn new(spec: Arc<QuestionnaireSpec>) -> Result<Self, WizardError> {
        let report = validate_spec(&spec);
        if !report.valid {
            return Err(WizardError::InvalidQuestionnaire {
                id: spec.id.clone(),
                summary: report
                    .issues
                    .iter()
                    .map(|issue| issue.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            });
        }
        let fields = FieldStore::for_spec(&spec);
        Ok(Self {
            spec,
            fields,
            current_step: 0,
            submission: SubmissionState::Idle,
        })
    }

    pub fn spec(&self) -> &QuestionnaireSpec {
        &self.spec
    }

    pub fn shared_spec(&self) -> Arc<QuestionnaireSpec> {
        Arc::clone(&self.spec)
    }

    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submission
    }

    pub fn is_last_step(&self) -> bool {
        self.spec.is_last_step(self.current_step)
    }

    pub(crate) fn fields_mut(&mut self) -> &mut FieldStore {
        &mut self.fields
    }

    pub(crate) fn set_step(&mut self, index: usize) {
        self.current_step = index.min(self.spec.last_step_index());
    }

    pub(crate) fn set_submission(&mut self, state: SubmissionState) {
        self.submission = state;
    }

    /// Back to the state of a freshly opened dialog.
    pub(crate) fn reset(&mut self) {
        self.fields.clear();
        self.current_step = 0;
        self.submission = SubmissionState::Idle;
    }
}
