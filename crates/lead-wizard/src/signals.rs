use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::submission::SubmissionNotice;

/// Notifications raised towards the host UI.
pub trait WizardSignals: Send + Sync {
    /// Fired exactly once per successful submission.
    fn on_success(&self) {}
    /// Fired when the user dismisses the dialog.
    fn on_close(&self) {}
    /// Fired when a write fails; the instance keeps its answers.
    fn on_failure(&self, _notice: &SubmissionNotice) {}
}

/// Host that ignores every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSignals;

impl WizardSignals for NoSignals {}

/// Counts signals; handy for hosts that poll instead of reacting.
#[derive(Debug, Default)]
pub struct SignalLog {
    successes: AtomicUsize,
    closes: AtomicUsize,
    failures: Mutex<Vec<SubmissionNotice>>,
}

impl SignalLog {
    pub fn successes(&self) -> usize {
        self.successes.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn failures(&self) -> Vec<SubmissionNotice> {
        self.failures
            .lock()
            .map(|failures| failures.clone())
            .unwrap_or_default()
    }
}

impl WizardSignals for SignalLog {
    fn on_success(&self) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_failure(&self, notice: &SubmissionNotice) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push(notice.clone());
        }
    }
}
