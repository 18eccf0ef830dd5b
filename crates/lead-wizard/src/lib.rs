//! Step wizard and lead submission engine.
//!
//! A [`WizardController`] walks a questionnaire one step at a time, only
//! moving forward once the step's required fields hold a value, and writes
//! the collected answers to a [`RecordStore`] with the questionnaire's
//! [`WritePolicy`](lead_spec::WritePolicy). [`LeadDesk`] hosts one controller
//! per questionnaire type.

pub mod controller;
pub mod desk;
pub mod error;
pub mod instance;
pub mod record;
pub mod signals;
pub mod store;
pub mod submission;

pub use controller::{Advance, WizardController};
pub use desk::LeadDesk;
pub use error::WizardError;
pub use instance::QuestionnaireInstance;
pub use lead_spec::{FieldStore, FieldValue, ServiceType, SubmissionState};
pub use record::{LeadRecord, LeadStatus, StoredLead};
pub use signals::{NoSignals, SignalLog, WizardSignals};
pub use store::{JsonFileStore, MemoryStore, RecordStore, StoreError, Tables};
pub use submission::{Locale, PendingSubmission, SubmissionNotice, build_record};
