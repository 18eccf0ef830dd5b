use lead_spec::{
    FieldStore, NextAction, QuestionnaireSpec, ServiceType, SubmissionState,
    build_render_payload, catalog, render_json_ui, render_text,
};

fn fixture(name: &str) -> &'static str {
    match name {
        "minimal" => include_str!("../tests/fixtures/minimal.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

#[test]
fn first_step_cannot_retreat_and_continues() {
    let spec = catalog::builtin(ServiceType::Energy);
    let fields = FieldStore::for_spec(&spec);
    let payload = build_render_payload(&spec, 0, &fields, SubmissionState::Idle);

    assert_eq!(payload.step_count, 6);
    assert_eq!(payload.progress_percent, 16);
    assert!(!payload.can_retreat);
    assert!(!payload.can_advance);
    assert_eq!(payload.next_action, NextAction::Continue);
    assert_eq!(payload.missing, vec!["address", "status"]);
}

#[test]
fn last_step_offers_submit() {
    let spec = catalog::builtin(ServiceType::Solar);
    let mut fields = FieldStore::for_spec(&spec);
    fields.set("name", "Bernard".into()).unwrap();
    fields.set("phone", "0700000000".into()).unwrap();
    let payload = build_render_payload(&spec, 2, &fields, SubmissionState::Idle);

    assert_eq!(payload.progress_percent, 100);
    assert_eq!(payload.next_action, NextAction::Submit);
    assert!(payload.can_advance);
    assert!(payload.can_retreat);
}

#[test]
fn in_flight_submission_disables_navigation() {
    let spec = catalog::builtin(ServiceType::GenericCallback);
    let mut fields = FieldStore::for_spec(&spec);
    for (id, value) in [("name", "Roux"), ("email", "roux@example.fr"), ("phone", "0102")] {
        fields.set(id, value.into()).unwrap();
    }
    let payload = build_render_payload(&spec, 0, &fields, SubmissionState::Submitting);
    assert!(!payload.can_advance);
    assert!(render_text(&payload).contains("Sending"));
}

#[test]
fn render_json_ui_exposes_structure() {
    let spec: QuestionnaireSpec = serde_json::from_str(fixture("minimal")).expect("deserialize");
    let mut fields = FieldStore::for_spec(&spec);
    fields.set("name", "Petit".into()).unwrap();
    let payload = build_render_payload(&spec, 0, &fields, SubmissionState::Idle);

    let ui = render_json_ui(&payload);
    assert_eq!(ui["questionnaire_id"], "rappel-express");
    assert_eq!(ui["step"]["count"], 2);
    assert_eq!(ui["next_action"], "continue");
    assert_eq!(ui["submission"], "idle");
    let rendered = ui["fields"].as_array().expect("fields array");
    assert_eq!(rendered[0]["current_value"], "Petit");
    assert_eq!(rendered[1]["required"], true);
    assert_eq!(ui["missing"][0], "phone");
}

#[test]
fn render_text_lists_choices_and_lists() {
    let spec = catalog::builtin(ServiceType::Telecom);
    let mut fields = FieldStore::for_spec(&spec);
    fields.toggle("services", "Internet").unwrap();
    fields.toggle("services", "Mobile").unwrap();
    let payload = build_render_payload(&spec, 0, &fields, SubmissionState::Failed);

    let text = render_text(&payload);
    assert!(text.contains("step 1/2"));
    assert!(text.contains("= Internet, Mobile"));
    assert!(text.contains("Missing: currentProvider"));
    assert!(text.contains("retry"));
}
