use std::collections::BTreeMap;
use std::sync::Arc;

use lead_spec::{QuestionnaireSpec, ServiceType, catalog};
use tracing::info;

use crate::controller::{Advance, WizardController};
use crate::error::WizardError;
use crate::signals::{NoSignals, WizardSignals};
use crate::store::RecordStore;
use crate::submission::Locale;

/// Host context for the questionnaire dialogs of the site.
///
/// Each questionnaire type owns an independent instance; at most one dialog
/// is shown at a time.
pub struct LeadDesk<S: RecordStore + ?Sized> {
    store: Arc<S>,
    specs: BTreeMap<ServiceType, Arc<QuestionnaireSpec>>,
    wizards: BTreeMap<ServiceType, WizardController<S>>,
    active: Option<ServiceType>,
    success_visible: bool,
    signals: Arc<dyn WizardSignals>,
    locale: Locale,
}

impl<S: RecordStore + ?Sized> LeadDesk<S> {
    /// Desk serving the built-in questionnaires.
    pub fn new(store: Arc<S>) -> Self {
        let specs = catalog::all()
            .into_iter()
            .map(|spec| (spec.service_type, Arc::new(spec)))
            .collect();
        Self {
            store,
            specs,
            wizards: BTreeMap::new(),
            active: None,
            success_visible: false,
            signals: Arc::new(NoSignals),
            locale: Locale::default(),
        }
    }

    pub fn with_signals(mut self, signals: Arc<dyn WizardSignals>) -> Self {
        self.signals = signals;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Serve `spec` instead of the built-in definition of its service type.
    pub fn with_questionnaire(mut self, spec: QuestionnaireSpec) -> Self {
        self.wizards.remove(&spec.service_type);
        self.specs.insert(spec.service_type, Arc::new(spec));
        self
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Show the dialog for `service`, hiding any other open one.
    pub fn open(&mut self, service: ServiceType) -> Result<&mut WizardController<S>, WizardError> {
        if !self.wizards.contains_key(&service) {
            let spec = self
                .specs
                .get(&service)
                .cloned()
                .ok_or(WizardError::UnknownQuestionnaire(service))?;
            let controller = WizardController::new(spec, Arc::clone(&self.store))?
                .with_signals(Arc::clone(&self.signals))
                .with_locale(self.locale);
            self.wizards.insert(service, controller);
        }
        if let Some(previous) = self.active.filter(|previous| *previous != service) {
            info!(from = %previous, to = %service, "questionnaire dialog switched");
        }
        self.active = Some(service);
        self.wizards
            .get_mut(&service)
            .ok_or(WizardError::UnknownQuestionnaire(service))
    }

    pub fn active_service(&self) -> Option<ServiceType> {
        self.active
    }

    pub fn active(&mut self) -> Result<&mut WizardController<S>, WizardError> {
        let service = self.active.ok_or(WizardError::NoActiveQuestionnaire)?;
        self.wizards
            .get_mut(&service)
            .ok_or(WizardError::NoActiveQuestionnaire)
    }

    /// Forward action on the open dialog; a stored lead unmounts it and
    /// raises the confirmation screen.
    pub async fn advance_active(&mut self) -> Result<Advance, WizardError> {
        let outcome = self.active()?.advance().await;
        if matches!(outcome, Advance::Submitted(_)) {
            self.success_visible = true;
            self.active = None;
        }
        Ok(outcome)
    }

    /// Dismiss the open dialog, discarding its answers.
    pub fn close_active(&mut self) -> Result<bool, WizardError> {
        let closed = self.active()?.close();
        if closed {
            self.active = None;
        }
        Ok(closed)
    }

    /// Whether the confirmation screen should be shown.
    pub fn success_visible(&self) -> bool {
        self.success_visible
    }

    pub fn dismiss_success(&mut self) {
        self.success_visible = false;
    }
}
