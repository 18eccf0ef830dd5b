mod config;
mod telemetry;
mod wizard;

use clap::{Parser, Subcommand};
use config::LeadConfig;
use lead_spec::{
    QuestionnaireSpec, RenderField, ServiceType, catalog, questionnaire_schema, validate_spec,
};
use lead_wizard::{
    Advance, FieldValue, JsonFileStore, Locale, RecordStore, StoredLead, WizardController,
};
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use wizard::{PromptReply, Verbosity, WizardPresenter, parse_reply};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    name = "leadwiz",
    author,
    version,
    about = "Lead questionnaire wizard CLI",
    long_about = "Runs the quote and callback questionnaires in a text shell, submits answer files, and inspects stored leads"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Walk through a questionnaire step by step.
    Wizard {
        /// Service line: energie, solaire, telecom, callback or job.
        #[arg(long, value_name = "SERVICE")]
        service: ServiceType,
        /// Custom questionnaire definition replacing the built-in one.
        #[arg(long, value_name = "SPEC")]
        spec: Option<PathBuf>,
        /// Lead store file (defaults to LEADWIZ_STORE or leads.json).
        #[arg(long, value_name = "FILE")]
        store: Option<PathBuf>,
        /// Show step summaries, failure causes and the stored record.
        #[arg(long, alias = "debug")]
        verbose: bool,
    },
    /// Submit a JSON object of answers without prompting.
    Submit {
        #[arg(long, value_name = "SERVICE")]
        service: ServiceType,
        /// JSON object mapping field ids to a string or a list of strings.
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
        #[arg(long, value_name = "SPEC")]
        spec: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        store: Option<PathBuf>,
    },
    /// Print stored leads as JSON lines.
    Leads {
        #[arg(long, value_name = "FILE")]
        store: Option<PathBuf>,
        /// Only this table; every table in the store by default.
        #[arg(long, value_name = "NAME")]
        table: Option<String>,
        /// Only leads of this service line.
        #[arg(long, value_name = "SERVICE")]
        service: Option<ServiceType>,
    },
    /// Print the built-in definition of a questionnaire.
    Describe {
        #[arg(long, value_name = "SERVICE")]
        service: ServiceType,
    },
    /// Print the JSON schema of questionnaire definitions.
    Schema,
    /// Validate a questionnaire definition file.
    Check {
        #[arg(long, value_name = "SPEC")]
        spec: PathBuf,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let config = LeadConfig::from_env()?;
    telemetry::init(&config.log_level)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(cli.command, config))
}

async fn run(command: Command, config: LeadConfig) -> CliResult<()> {
    match command {
        Command::Wizard {
            service,
            spec,
            store,
            verbose,
        } => {
            let spec = load_questionnaire(service, spec.as_deref())?;
            let store = Arc::new(JsonFileStore::new(config.store_path_or(store)));
            run_wizard(spec, store, config.locale, verbose).await
        }
        Command::Submit {
            service,
            answers,
            spec,
            store,
        } => {
            let spec = load_questionnaire(service, spec.as_deref())?;
            let store = Arc::new(JsonFileStore::new(config.store_path_or(store)));
            let lead = run_submit(spec, store, config.locale, &answers).await?;
            println!("{}", serde_json::to_string(&lead)?);
            Ok(())
        }
        Command::Leads {
            store,
            table,
            service,
        } => {
            let store = JsonFileStore::new(config.store_path_or(store));
            run_leads(&store, table, service).await
        }
        Command::Describe { service } => {
            let spec = catalog::builtin(service);
            println!("{}", serde_json::to_string_pretty(&spec)?);
            Ok(())
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&questionnaire_schema())?);
            Ok(())
        }
        Command::Check { spec } => run_check(&spec),
    }
}

fn load_questionnaire(service: ServiceType, path: Option<&Path>) -> CliResult<QuestionnaireSpec> {
    let Some(path) = path else {
        return Ok(catalog::builtin(service));
    };
    let spec = catalog::load(path)?;
    if spec.service_type != service {
        return Err(format!(
            "{} describes service '{}', not '{}'",
            path.display(),
            spec.service_type,
            service
        )
        .into());
    }
    Ok(spec)
}

async fn run_wizard(
    spec: QuestionnaireSpec,
    store: Arc<JsonFileStore>,
    locale: Locale,
    verbose: bool,
) -> CliResult<()> {
    let mut controller = WizardController::new(Arc::new(spec), store)?.with_locale(locale);
    let mut presenter = WizardPresenter::new(Verbosity::from_verbose(verbose), locale);

    'steps: loop {
        let payload = controller.render();
        presenter.show_header(&payload);
        presenter.show_step(&payload);

        for field in &payload.fields {
            match prompt_field(&presenter, field)? {
                PromptReply::Keep => {}
                PromptReply::Value(value) => controller.set_field(&field.id, value)?,
                PromptReply::Back => {
                    if !controller.retreat() {
                        println!("Already on the first step.");
                    }
                    continue 'steps;
                }
                PromptReply::Close => {
                    controller.close();
                    presenter.show_closed();
                    return Ok(());
                }
            }
        }

        loop {
            match controller.advance().await {
                Advance::Blocked => {
                    presenter.show_blocked(&controller.render());
                    continue 'steps;
                }
                Advance::Moved(step) => {
                    debug!(step, "wizard moved forward");
                    continue 'steps;
                }
                Advance::Submitted(lead) => {
                    presenter.show_completion(&lead);
                    return Ok(());
                }
                Advance::Failed(notice) => {
                    presenter.show_failure(&notice);
                    if !prompt_yes_no("Retry?", true)? {
                        return Err("submission abandoned after a failed write".into());
                    }
                }
                Advance::InFlight | Advance::Stale => {
                    return Err("a submission is already in flight".into());
                }
            }
        }
    }
}

fn prompt_field(presenter: &WizardPresenter, field: &RenderField) -> CliResult<PromptReply> {
    loop {
        presenter.show_prompt(field);
        let input = read_line("> ")?;
        match parse_reply(field, &input) {
            Ok(reply) => return Ok(reply),
            Err(err) => presenter.show_parse_error(&err),
        }
    }
}

fn prompt_yes_no(prompt: &str, default: bool) -> CliResult<bool> {
    let suffix = if default { "[Y/n]" } else { "[y/N]" };
    loop {
        let input = read_line(&format!("{} {} ", prompt, suffix))?;
        match input.trim().to_ascii_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" | "o" | "oui" | "j" | "ja" => return Ok(true),
            "n" | "no" | "non" | "nee" => return Ok(false),
            _ => println!("Please answer y or n."),
        }
    }
}

fn read_line(prompt: &str) -> CliResult<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Err("input closed before the questionnaire was finished".into());
    }
    Ok(line)
}

async fn run_submit(
    spec: QuestionnaireSpec,
    store: Arc<JsonFileStore>,
    locale: Locale,
    answers_path: &Path,
) -> CliResult<StoredLead> {
    let answers: Value = serde_json::from_str(&fs::read_to_string(answers_path)?)?;
    let answers = answers
        .as_object()
        .ok_or("answers file must contain a JSON object")?;

    let mut controller = WizardController::new(Arc::new(spec), store)?.with_locale(locale);
    for (field_id, value) in answers {
        controller.set_field(field_id, answer_value(field_id, value)?)?;
    }

    loop {
        match controller.advance().await {
            Advance::Moved(_) => continue,
            Advance::Blocked => {
                let completeness = controller.completeness();
                return Err(format!(
                    "step {} is incomplete; missing: {}",
                    controller.current_step() + 1,
                    completeness.missing.join(", ")
                )
                .into());
            }
            Advance::Submitted(lead) => {
                info!(lead = %lead.id, table = %lead.table, "lead submitted");
                return Ok(lead);
            }
            Advance::Failed(notice) => {
                return Err(format!("{} ({})", notice.message(), notice.detail).into());
            }
            Advance::InFlight | Advance::Stale => {
                return Err("a submission is already in flight".into());
            }
        }
    }
}

fn answer_value(field_id: &str, value: &Value) -> CliResult<FieldValue> {
    match value {
        Value::String(text) => Ok(FieldValue::Text(text.clone())),
        Value::Number(number) => Ok(FieldValue::Text(number.to_string())),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(String::from).ok_or_else(|| {
                    format!("answer '{}' must only list strings", field_id).into()
                })
            })
            .collect::<CliResult<Vec<_>>>()
            .map(FieldValue::List),
        _ => Err(format!(
            "answer '{}' must be a string or a list of strings",
            field_id
        )
        .into()),
    }
}

async fn run_leads(
    store: &JsonFileStore,
    table: Option<String>,
    service: Option<ServiceType>,
) -> CliResult<()> {
    let tables = match table {
        Some(table) => vec![table],
        None => store.table_names().await?,
    };
    for table in &tables {
        for lead in store.list(table).await? {
            if service.is_some_and(|service| lead.record.service_type != service) {
                continue;
            }
            println!("{}", serde_json::to_string(&lead)?);
        }
    }
    Ok(())
}

fn run_check(path: &Path) -> CliResult<()> {
    let spec: QuestionnaireSpec = serde_json::from_str(&fs::read_to_string(path)?)?;
    let report = validate_spec(&spec);
    println!(
        "Validation result: {}",
        if report.valid { "valid" } else { "invalid" }
    );
    for issue in &report.issues {
        println!("  {} [{}] {}", issue.path, issue.code, issue.message);
    }

    if report.valid {
        Ok(())
    } else {
        Err("questionnaire definition is invalid".into())
    }
}
