use std::sync::Arc;

use lead_spec::ServiceType;
use lead_wizard::{Advance, LeadDesk, Locale, MemoryStore, RecordStore, SignalLog, WizardError};

#[tokio::test]
async fn questionnaires_keep_independent_instances() {
    let store = Arc::new(MemoryStore::new());
    let mut desk = LeadDesk::new(Arc::clone(&store));

    desk.open(ServiceType::Energy)
        .unwrap()
        .set_field("address", "5 rue Pasteur")
        .unwrap();
    let telecom = desk.open(ServiceType::Telecom).unwrap();
    assert!(telecom.instance().fields().is_blank());
    assert_eq!(desk.active_service(), Some(ServiceType::Telecom));

    let energy = desk.open(ServiceType::Energy).unwrap();
    assert_eq!(energy.instance().fields().text("address"), Some("5 rue Pasteur"));
}

#[tokio::test]
async fn callback_submission_shows_confirmation_and_unmounts() {
    let store = Arc::new(MemoryStore::new());
    let signals = Arc::new(SignalLog::default());
    let mut desk = LeadDesk::new(Arc::clone(&store)).with_signals(signals.clone());

    let wizard = desk.open(ServiceType::GenericCallback).unwrap();
    wizard.set_field("name", "Chevalier").unwrap();
    wizard.set_field("email", "chevalier@example.fr").unwrap();
    wizard.set_field("phone", "0611223344").unwrap();

    let outcome = desk.advance_active().await.unwrap();
    assert!(matches!(outcome, Advance::Submitted(_)));
    assert!(desk.success_visible());
    assert_eq!(desk.active_service(), None);
    assert_eq!(signals.successes(), 1);
    assert!(matches!(
        desk.advance_active().await,
        Err(WizardError::NoActiveQuestionnaire)
    ));

    desk.dismiss_success();
    assert!(!desk.success_visible());

    let reopened = desk.open(ServiceType::GenericCallback).unwrap();
    assert!(reopened.instance().fields().is_blank());
    assert_eq!(reopened.current_step(), 0);
    assert_eq!(store.list("callback_requests").await.unwrap().len(), 1);
}

#[tokio::test]
async fn failed_submission_stays_open_with_localized_notice() {
    let store = Arc::new(MemoryStore::new());
    let mut desk = LeadDesk::new(Arc::clone(&store)).with_locale(Locale::Nl);

    let wizard = desk.open(ServiceType::JobApplication).unwrap();
    for (id, value) in [("nom", "Roche"), ("prenom", "Hugo"), ("phone", "0699"), ("age", "31")] {
        wizard.set_field(id, value).unwrap();
    }
    store.fail_next(1);

    let outcome = desk.advance_active().await.unwrap();
    let Advance::Failed(notice) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(notice.message().starts_with("Er is"));
    assert!(!desk.success_visible());
    assert_eq!(desk.active_service(), Some(ServiceType::JobApplication));
    assert_eq!(desk.active().unwrap().instance().fields().text("nom"), Some("Roche"));
}

#[tokio::test]
async fn closing_the_dialog_discards_answers() {
    let store = Arc::new(MemoryStore::new());
    let mut desk = LeadDesk::new(Arc::clone(&store));
    desk.open(ServiceType::Solar)
        .unwrap()
        .set_field("kwh", "4000")
        .unwrap();

    assert!(desk.close_active().unwrap());
    assert_eq!(desk.active_service(), None);
    assert!(desk.open(ServiceType::Solar).unwrap().instance().fields().is_blank());
    assert_eq!(store.attempts(), 0);
}
