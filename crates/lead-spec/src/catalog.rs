use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::spec::{QuestionnaireSpec, ServiceType};
use crate::validate::validate_spec;

const ENERGIE: &str = include_str!("../catalog/energie.json");
const SOLAIRE: &str = include_str!("../catalog/solaire.json");
const TELECOM: &str = include_str!("../catalog/telecom.json");
const CALLBACK: &str = include_str!("../catalog/callback.json");
const JOB: &str = include_str!("../catalog/job.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read questionnaire {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse questionnaire: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("questionnaire '{id}' is invalid: {summary}")]
    Invalid { id: String, summary: String },
}

fn source_for(service: ServiceType) -> &'static str {
    match service {
        ServiceType::Energy => ENERGIE,
        ServiceType::Solar => SOLAIRE,
        ServiceType::Telecom => TELECOM,
        ServiceType::GenericCallback => CALLBACK,
        ServiceType::JobApplication => JOB,
    }
}

/// Built-in questionnaire for `service`.
pub fn builtin(service: ServiceType) -> QuestionnaireSpec {
    serde_json::from_str(source_for(service))
        .expect("embedded questionnaire definitions are valid JSON")
}

/// Every built-in questionnaire, in `ServiceType::ALL` order.
pub fn all() -> Vec<QuestionnaireSpec> {
    ServiceType::ALL.into_iter().map(builtin).collect()
}

/// Parse and structurally check a questionnaire definition.
pub fn from_json_str(json: &str) -> Result<QuestionnaireSpec, CatalogError> {
    let spec: QuestionnaireSpec = serde_json::from_str(json).map_err(CatalogError::Parse)?;
    let report = validate_spec(&spec);
    if !report.valid {
        let summary = report
            .issues
            .iter()
            .map(|issue| issue.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(CatalogError::Invalid {
            id: spec.id,
            summary,
        });
    }
    Ok(spec)
}

/// Load a custom questionnaire from a JSON file.
pub fn load(path: &Path) -> Result<QuestionnaireSpec, CatalogError> {
    let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_json_str(&contents)
}
