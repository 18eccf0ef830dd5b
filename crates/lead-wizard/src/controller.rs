use std::sync::Arc;

use chrono::Utc;
use lead_spec::{
    FieldValue, QuestionnaireSpec, RenderPayload, StepCompleteness, SubmissionState,
    build_render_payload, completeness_at,
};
use tracing::{debug, info, warn};

use crate::error::WizardError;
use crate::instance::QuestionnaireInstance;
use crate::record::StoredLead;
use crate::signals::{NoSignals, WizardSignals};
use crate::store::{RecordStore, StoreError};
use crate::submission::{Locale, PendingSubmission, SubmissionNotice};

/// Result of pressing the forward button.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// The current step is incomplete; nothing changed.
    Blocked,
    /// Moved to the step with this index.
    Moved(usize),
    /// A write for this instance is still pending; nothing changed.
    InFlight,
    /// The lead was stored and the instance reset.
    Submitted(StoredLead),
    /// The write failed; answers and step are untouched.
    Failed(SubmissionNotice),
    /// A write result arrived with no write pending; it was discarded.
    Stale,
}

/// Drives one questionnaire instance through its steps and submission.
pub struct WizardController<S: RecordStore + ?Sized> {
    instance: QuestionnaireInstance,
    store: Arc<S>,
    signals: Arc<dyn WizardSignals>,
    locale: Locale,
}

impl<S: RecordStore + ?Sized> WizardController<S> {
    pub fn new(spec: Arc<QuestionnaireSpec>, store: Arc<S>) -> Result<Self, WizardError> {
        Ok(Self {
            instance: QuestionnaireInstance::new(spec)?,
            store,
            signals: Arc::new(NoSignals),
            locale: Locale::default(),
        })
    }

    pub fn with_signals(mut self, signals: Arc<dyn WizardSignals>) -> Self {
        self.signals = signals;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn instance(&self) -> &QuestionnaireInstance {
        &self.instance
    }

    pub fn spec(&self) -> &QuestionnaireSpec {
        self.instance.spec()
    }

    pub fn current_step(&self) -> usize {
        self.instance.current_step()
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.instance.submission_state()
    }

    pub fn completeness(&self) -> StepCompleteness {
        completeness_at(
            self.instance.spec(),
            self.instance.current_step(),
            self.instance.fields(),
        )
    }

    /// Whether the forward action is enabled for the current step.
    pub fn can_advance(&self) -> bool {
        !self.submission_state().is_in_flight() && self.completeness().complete
    }

    pub fn render(&self) -> RenderPayload {
        build_render_payload(
            self.instance.spec(),
            self.instance.current_step(),
            self.instance.fields(),
            self.instance.submission_state(),
        )
    }

    /// Overwrite one answer. Presence is all that is ever checked.
    pub fn set_field(
        &mut self,
        field_id: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.instance.fields_mut().set(field_id, value.into())?;
        Ok(())
    }

    /// Flip one option of a multi-choice field; returns whether it is now selected.
    pub fn toggle_choice(&mut self, field_id: &str, option: &str) -> Result<bool, WizardError> {
        self.ensure_editable()?;
        Ok(self.instance.fields_mut().toggle(field_id, option)?)
    }

    fn ensure_editable(&mut self) -> Result<(), WizardError> {
        match self.submission_state() {
            SubmissionState::Submitting => Err(WizardError::SubmissionInFlight),
            SubmissionState::Failed => {
                self.instance.set_submission(SubmissionState::Idle);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Forward action: next step, or submission on the last step.
    pub async fn advance(&mut self) -> Advance {
        if self.submission_state().is_in_flight() {
            return Advance::InFlight;
        }
        let completeness = self.completeness();
        if !completeness.complete {
            debug!(
                questionnaire = %self.spec().id,
                step = self.current_step(),
                missing = ?completeness.missing,
                "advance blocked"
            );
            return Advance::Blocked;
        }
        if self.instance.is_last_step() {
            return self.submit().await;
        }
        let next = self.current_step() + 1;
        self.instance.set_step(next);
        debug!(questionnaire = %self.spec().id, step = next, "step advanced");
        Advance::Moved(next)
    }

    /// Back action; always allowed except on the first step or mid-write.
    pub fn retreat(&mut self) -> bool {
        let current = self.current_step();
        if current == 0 || self.submission_state().is_in_flight() {
            return false;
        }
        self.instance.set_step(current - 1);
        debug!(questionnaire = %self.spec().id, step = current - 1, "step retreated");
        true
    }

    /// Dismiss the dialog without submitting. Ignored while a write is pending.
    pub fn close(&mut self) -> bool {
        if self.submission_state().is_in_flight() {
            return false;
        }
        self.instance.reset();
        info!(questionnaire = %self.spec().id, "questionnaire closed");
        self.signals.on_close();
        true
    }

    /// Enter `submitting` and detach the record to write.
    ///
    /// Returns `None` unless the instance sits on a complete last step with no
    /// write in flight, so a second trigger never produces a second write.
    pub fn begin_submission(&mut self) -> Option<PendingSubmission> {
        if !self.instance.is_last_step() || !self.can_advance() {
            return None;
        }
        self.instance.set_submission(SubmissionState::Submitting);
        info!(questionnaire = %self.spec().id, "submission started");
        Some(PendingSubmission::prepare(
            self.instance.spec(),
            self.instance.fields(),
            Utc::now(),
        ))
    }

    /// Apply the outcome of a write started with [`Self::begin_submission`].
    ///
    /// Only the first result per pending write counts; later ones return
    /// [`Advance::Stale`] and leave state and signals untouched.
    pub fn finish_submission(&mut self, result: Result<StoredLead, StoreError>) -> Advance {
        if !self.submission_state().is_in_flight() {
            warn!(questionnaire = %self.spec().id, "submission result without a pending write");
            return Advance::Stale;
        }
        match result {
            Ok(stored) => {
                self.instance.set_submission(SubmissionState::Succeeded);
                info!(
                    questionnaire = %self.spec().id,
                    lead = %stored.id,
                    table = %stored.table,
                    "submission stored"
                );
                self.signals.on_success();
                self.instance.reset();
                Advance::Submitted(stored)
            }
            Err(err) => {
                self.instance.set_submission(SubmissionState::Failed);
                warn!(questionnaire = %self.spec().id, error = %err, "submission failed");
                let notice = SubmissionNotice::new(&self.spec().id, &err, self.locale);
                self.signals.on_failure(&notice);
                Advance::Failed(notice)
            }
        }
    }

    /// Write the accumulated answers with the questionnaire's policy.
    pub async fn submit(&mut self) -> Advance {
        if self.submission_state().is_in_flight() {
            return Advance::InFlight;
        }
        let Some(pending) = self.begin_submission() else {
            return Advance::Blocked;
        };
        let result = pending.execute(self.store.as_ref()).await;
        self.finish_submission(result)
    }
}
