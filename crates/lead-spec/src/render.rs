use serde_json::{Map, Value, json};

use crate::{
    answers::{FieldStore, FieldValue},
    completeness::step_completeness,
    spec::{FieldKind, QuestionnaireSpec},
    state::SubmissionState,
};

/// Label of the forward button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    /// Move to the following step.
    Continue,
    /// Last step: send the answers.
    Submit,
}

impl NextAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            NextAction::Continue => "continue",
            NextAction::Submit => "submit",
        }
    }
}

/// Describes a single input of the current step.
#[derive(Debug, Clone)]
pub struct RenderField {
    pub id: String,
    pub title: String,
    pub kind: FieldKind,
    pub required: bool,
    pub choices: Option<Vec<String>>,
    pub placeholder: Option<String>,
    pub current_value: Option<FieldValue>,
}

/// Collected payload used by both text and JSON renderers.
#[derive(Debug, Clone)]
pub struct RenderPayload {
    pub questionnaire_id: String,
    pub title: String,
    pub step_index: usize,
    pub step_count: usize,
    pub step_id: String,
    pub step_title: String,
    pub progress_percent: u8,
    pub fields: Vec<RenderField>,
    pub missing: Vec<String>,
    pub can_advance: bool,
    pub can_retreat: bool,
    pub next_action: NextAction,
    pub submission: SubmissionState,
}

/// Build the renderer payload for the step at `step_index`.
pub fn build_render_payload(
    spec: &QuestionnaireSpec,
    step_index: usize,
    fields: &FieldStore,
    submission: SubmissionState,
) -> RenderPayload {
    let step_count = spec.step_count();
    let step_index = step_index.min(spec.last_step_index());
    let in_flight = submission.is_in_flight();

    let (step_id, step_title, render_fields, completeness) = match spec.step(step_index) {
        Some(step) => {
            let render_fields = step
                .fields
                .iter()
                .filter_map(|field_id| spec.field(field_id))
                .map(|field| RenderField {
                    id: field.id.clone(),
                    title: field.title.clone(),
                    kind: field.kind,
                    required: step.is_required(&field.id),
                    choices: field.choices.clone(),
                    placeholder: field.placeholder.clone(),
                    current_value: fields.get(&field.id).cloned(),
                })
                .collect();
            (
                step.id.clone(),
                step.title.clone(),
                render_fields,
                Some(step_completeness(step, fields)),
            )
        }
        None => (String::new(), String::new(), Vec::new(), None),
    };

    let complete = completeness.as_ref().is_some_and(|result| result.complete);
    let missing = completeness.map(|result| result.missing).unwrap_or_default();
    let progress_percent = if step_count == 0 {
        0
    } else {
        ((step_index + 1) * 100 / step_count) as u8
    };
    let next_action = if spec.is_last_step(step_index) {
        NextAction::Submit
    } else {
        NextAction::Continue
    };

    RenderPayload {
        questionnaire_id: spec.id.clone(),
        title: spec.title.clone(),
        step_index,
        step_count,
        step_id,
        step_title,
        progress_percent,
        fields: render_fields,
        missing,
        can_advance: complete && !in_flight,
        can_retreat: step_index > 0 && !in_flight,
        next_action,
        submission,
    }
}

/// Render the payload as a structured JSON-friendly value.
pub fn render_json_ui(payload: &RenderPayload) -> Value {
    let fields = payload
        .fields
        .iter()
        .map(|field| {
            let mut map = Map::new();
            map.insert("id".into(), Value::String(field.id.clone()));
            map.insert("title".into(), Value::String(field.title.clone()));
            map.insert("kind".into(), Value::String(field.kind.as_str().into()));
            map.insert("required".into(), Value::Bool(field.required));
            if let Some(choices) = &field.choices {
                map.insert(
                    "choices".into(),
                    Value::Array(choices.iter().cloned().map(Value::String).collect()),
                );
            }
            if let Some(placeholder) = &field.placeholder {
                map.insert("placeholder".into(), Value::String(placeholder.clone()));
            }
            if let Some(value) = &field.current_value {
                map.insert("current_value".into(), value.to_json());
            }
            Value::Object(map)
        })
        .collect::<Vec<_>>();

    json!({
        "questionnaire_id": payload.questionnaire_id,
        "title": payload.title,
        "step": {
            "index": payload.step_index,
            "count": payload.step_count,
            "id": payload.step_id,
            "title": payload.step_title,
        },
        "progress_percent": payload.progress_percent,
        "fields": fields,
        "missing": payload.missing,
        "can_advance": payload.can_advance,
        "can_retreat": payload.can_retreat,
        "next_action": payload.next_action.as_str(),
        "submission": payload.submission.as_str(),
    })
}

/// Render the payload as human-friendly text.
pub fn render_text(payload: &RenderPayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} - step {}/{} ({}%)",
        payload.title,
        payload.step_index + 1,
        payload.step_count,
        payload.progress_percent
    ));
    lines.push(format!("== {}", payload.step_title));

    for field in &payload.fields {
        let mut entry = format!(" - {}", field.title);
        if field.required {
            entry.push_str(" *");
        }
        if let Some(choices) = &field.choices {
            entry.push_str(&format!(" [{}]", choices.join(" / ")));
        }
        if let Some(value) = field.current_value.as_ref().filter(|value| !value.is_empty()) {
            entry.push_str(&format!(" = {}", value.display()));
        }
        lines.push(entry);
    }

    if !payload.missing.is_empty() {
        lines.push(format!("Missing: {}", payload.missing.join(", ")));
    }
    match payload.submission {
        SubmissionState::Submitting => lines.push("Sending...".to_string()),
        SubmissionState::Failed => lines.push("Last submission failed; you can retry.".to_string()),
        _ => {}
    }

    lines.join("\n")
}
