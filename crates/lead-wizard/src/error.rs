use lead_spec::{FieldError, ServiceType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("questionnaire '{id}' is invalid: {summary}")]
    InvalidQuestionnaire { id: String, summary: String },
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("no questionnaire is registered for '{0}'")]
    UnknownQuestionnaire(ServiceType),
    #[error("no questionnaire dialog is open")]
    NoActiveQuestionnaire,
}
