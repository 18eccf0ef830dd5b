use lead_spec::{FieldKind, RenderField, RenderPayload, render_text};
use lead_wizard::{FieldValue, Locale, StoredLead, SubmissionNotice};

/// Controls which bits of state the wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: step header and field prompts only.
    Clean,
    /// Verbose output: full step summary, submission state, stored record.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// What the user typed at a field prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptReply {
    /// Keep whatever the field currently holds.
    Keep,
    Value(FieldValue),
    Back,
    Close,
}

/// Prints steps and prompts as the controller moves through a questionnaire.
pub struct WizardPresenter {
    verbosity: Verbosity,
    locale: Locale,
    header_printed: bool,
}

impl WizardPresenter {
    pub fn new(verbosity: Verbosity, locale: Locale) -> Self {
        Self {
            verbosity,
            locale,
            header_printed: false,
        }
    }

    pub fn show_header(&mut self, payload: &RenderPayload) {
        if self.header_printed {
            return;
        }
        println!("Questionnaire: {}", payload.title);
        println!("Type :back to return to the previous step, :close to leave.");
        self.header_printed = true;
    }

    pub fn show_step(&self, payload: &RenderPayload) {
        if self.verbosity.is_verbose() {
            println!("{}", render_text(payload));
            println!("Submission: {}", payload.submission.as_str());
        } else {
            println!(
                "Step {}/{} ({}%): {}",
                payload.step_index + 1,
                payload.step_count,
                payload.progress_percent,
                payload.step_title
            );
        }
    }

    pub fn show_prompt(&self, field: &RenderField) {
        let mut line = field.title.clone();
        if field.required {
            line.push_str(" *");
        }
        if let Some(hint) = prompt_hint(field) {
            line.push(' ');
            line.push_str(&hint);
        }
        if let Some(current) = field.current_value.as_ref().filter(|value| !value.is_empty()) {
            line.push_str(&format!(" [{}]", current.display()));
        } else if let Some(placeholder) = &field.placeholder {
            line.push_str(&format!(" (e.g. {})", placeholder));
        }
        println!("{}", line);
    }

    pub fn show_parse_error(&self, error: &AnswerParseError) {
        eprintln!("Invalid answer: {}", error.user_message);
        if let Some(debug) = &error.debug_message {
            eprintln!("  Expected: {}", debug);
        }
    }

    pub fn show_blocked(&self, payload: &RenderPayload) {
        println!("Please complete: {}", payload.missing.join(", "));
    }

    pub fn show_failure(&self, notice: &SubmissionNotice) {
        eprintln!("{}", notice.message());
        if self.verbosity.is_verbose() {
            eprintln!("  Cause: {}", notice.detail);
        }
    }

    pub fn show_completion(&self, lead: &StoredLead) {
        println!("{}", self.locale.confirmation());
        if self.verbosity.is_verbose() {
            match serde_json::to_string_pretty(lead) {
                Ok(pretty) => println!("{}", pretty),
                Err(err) => eprintln!("Failed to serialize stored lead: {}", err),
            }
        }
    }

    pub fn show_closed(&self) {
        println!("Questionnaire closed; nothing was sent.");
    }
}

fn prompt_hint(field: &RenderField) -> Option<String> {
    let choices = field.choices.as_deref().unwrap_or_default();
    match field.kind {
        FieldKind::Choice if !choices.is_empty() => Some(format!("({})", numbered(choices))),
        FieldKind::MultiChoice if !choices.is_empty() => Some(format!(
            "(comma-separated: {})",
            numbered(choices)
        )),
        FieldKind::MultiChoice => Some("(comma-separated)".to_string()),
        _ => None,
    }
}

fn numbered(choices: &[String]) -> String {
    choices
        .iter()
        .enumerate()
        .map(|(index, choice)| format!("{}={}", index + 1, choice))
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Interpret one line typed at a field prompt.
pub fn parse_reply(field: &RenderField, raw: &str) -> Result<PromptReply, AnswerParseError> {
    let trimmed = raw.trim();
    match trimmed {
        ":back" => return Ok(PromptReply::Back),
        ":close" => return Ok(PromptReply::Close),
        "" => return Ok(PromptReply::Keep),
        _ => {}
    }
    let choices = field.choices.as_deref().unwrap_or_default();
    let value = match field.kind {
        FieldKind::Text => FieldValue::Text(trimmed.to_string()),
        FieldKind::Choice => FieldValue::Text(resolve_choice(choices, trimmed)?),
        FieldKind::MultiChoice => FieldValue::List(
            trimmed
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| resolve_choice(choices, part))
                .collect::<Result<_, _>>()?,
        ),
    };
    Ok(PromptReply::Value(value))
}

/// Accepts a 1-based option number or the option text (case-insensitive).
fn resolve_choice(choices: &[String], raw: &str) -> Result<String, AnswerParseError> {
    if choices.is_empty() {
        return Ok(raw.to_string());
    }
    if let Ok(index) = raw.parse::<usize>()
        && let Some(choice) = index.checked_sub(1).and_then(|index| choices.get(index))
    {
        return Ok(choice.clone());
    }
    choices
        .iter()
        .find(|choice| choice.eq_ignore_ascii_case(raw))
        .cloned()
        .ok_or_else(|| {
            AnswerParseError::new(
                format!("'{}' is not one of the options.", raw),
                Some(choices.join(", ")),
            )
        })
}

/// Error produced when parsing answers from the user.
#[derive(Debug)]
pub struct AnswerParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl AnswerParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}
