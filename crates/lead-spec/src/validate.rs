use std::collections::BTreeSet;

use serde::Serialize;

use crate::spec::{FormDataShape, QuestionnaireSpec};

/// Single structural problem in a questionnaire definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecIssue {
    pub code: &'static str,
    pub path: String,
    pub message: String,
}

/// Result of checking a questionnaire definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecReport {
    pub valid: bool,
    pub issues: Vec<SpecIssue>,
}

impl SpecReport {
    pub fn codes(&self) -> Vec<&'static str> {
        self.issues.iter().map(|issue| issue.code).collect()
    }
}

pub fn validate_spec(spec: &QuestionnaireSpec) -> SpecReport {
    let mut issues = Vec::new();

    if spec.steps.is_empty() {
        issues.push(issue("no_steps", "/steps", "questionnaire has no steps".into()));
    }

    let mut known = BTreeSet::new();
    for (index, field) in spec.fields.iter().enumerate() {
        if !known.insert(field.id.as_str()) {
            issues.push(issue(
                "duplicate_field",
                format!("/fields/{}", index),
                format!("field '{}' is declared twice", field.id),
            ));
        }
    }

    let mut collected = BTreeSet::new();
    for (step_index, step) in spec.steps.iter().enumerate() {
        for field_id in &step.fields {
            if !known.contains(field_id.as_str()) {
                issues.push(issue(
                    "unknown_step_field",
                    format!("/steps/{}/fields", step_index),
                    format!("step '{}' collects unknown field '{}'", step.id, field_id),
                ));
            }
            collected.insert(field_id.as_str());
        }
        for field_id in &step.required {
            if !step.fields.contains(field_id) {
                issues.push(issue(
                    "required_not_collected",
                    format!("/steps/{}/required", step_index),
                    format!(
                        "step '{}' requires '{}' without collecting it",
                        step.id, field_id
                    ),
                ));
            }
        }
    }

    for field in &spec.fields {
        if !collected.contains(field.id.as_str()) {
            issues.push(issue(
                "orphan_field",
                "/fields",
                format!("field '{}' is not collected by any step", field.id),
            ));
        }
    }

    if spec.contact.name.is_empty() {
        issues.push(issue(
            "empty_contact_name",
            "/contact/name",
            "contact name maps no fields".into(),
        ));
    }
    for field_id in spec.contact.referenced_fields() {
        match spec.field(field_id) {
            None => issues.push(issue(
                "unknown_contact_field",
                "/contact",
                format!("contact mapping references unknown field '{}'", field_id),
            )),
            Some(field) if field.kind.is_list() => issues.push(issue(
                "list_contact_field",
                "/contact",
                format!(
                    "contact mapping references '{}', a {} field; contact columns hold one value",
                    field_id,
                    field.kind.as_str()
                ),
            )),
            Some(_) => {}
        }
    }
    // The phone is the upsert identity; an optional one lets blank phones collide.
    let phone = &spec.contact.phone;
    if !spec.steps.iter().any(|step| step.required.contains(phone)) {
        issues.push(issue(
            "contact_phone_optional",
            "/contact/phone",
            format!("contact phone '{}' is not required by any step", phone),
        ));
    }

    if let FormDataShape::Labelled { fields } = &spec.form_data {
        for labelled in fields {
            if !known.contains(labelled.field.as_str()) {
                issues.push(issue(
                    "unknown_form_data_field",
                    "/form_data/fields",
                    format!(
                        "form data label '{}' references unknown field '{}'",
                        labelled.label, labelled.field
                    ),
                ));
            }
        }
    }

    SpecReport {
        valid: issues.is_empty(),
        issues,
    }
}

fn issue(code: &'static str, path: impl Into<String>, message: String) -> SpecIssue {
    SpecIssue {
        code,
        path: path.into(),
        message,
    }
}
