use assert_cmd::Command;
use assert_fs::TempDir;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn leadwiz(workdir: &Path) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("leadwiz")?;
    cmd.current_dir(workdir)
        .env_remove("RUST_LOG")
        .env_remove("LEADWIZ_STORE")
        .env_remove("LEADWIZ_LOCALE")
        .env("LEADWIZ_LOG", "off");
    Ok(cmd)
}

fn stored_leads(workdir: &Path, store: &Path) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let output = leadwiz(workdir)?
        .arg("leads")
        .arg("--store")
        .arg(store)
        .output()?;
    assert!(output.status.success());
    String::from_utf8(output.stdout)?
        .lines()
        .map(|line| serde_json::from_str(line).map_err(Into::into))
        .collect()
}

fn write_answers(dir: &Path, name: &str, answers: Value) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let path = dir.join(name);
    fs::write(&path, answers.to_string())?;
    Ok(path)
}

#[test]
fn schema_describes_questionnaire_definitions() -> TestResult {
    let workspace = TempDir::new()?;
    let output = leadwiz(workspace.path())?.arg("schema").output()?;
    assert!(output.status.success());
    let schema: Value = serde_json::from_slice(&output.stdout)?;
    assert!(schema["properties"]["steps"].is_object());
    assert!(schema["properties"]["write_policy"].is_object());
    Ok(())
}

#[test]
fn describe_prints_builtin_definition() -> TestResult {
    let workspace = TempDir::new()?;
    let output = leadwiz(workspace.path())?
        .args(["describe", "--service", "energie"])
        .output()?;
    assert!(output.status.success());
    let spec: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(spec["service_type"], "energie");
    assert_eq!(spec["steps"].as_array().map(Vec::len), Some(6));
    Ok(())
}

#[test]
fn unknown_service_is_rejected() -> TestResult {
    let workspace = TempDir::new()?;
    leadwiz(workspace.path())?
        .args(["describe", "--service", "chauffage"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn job_application_is_submitted_with_labelled_form_data() -> TestResult {
    let workspace = TempDir::new()?;
    let store = workspace.path().join("leads.json");
    let answers = write_answers(
        workspace.path(),
        "job.json",
        json!({ "nom": "Roche", "prenom": "Hugo", "phone": "0699887766", "age": 31 }),
    )?;

    leadwiz(workspace.path())?
        .args(["submit", "--service", "job", "--answers"])
        .arg(&answers)
        .arg("--store")
        .arg(&store)
        .assert()
        .success();

    let leads = stored_leads(workspace.path(), &store)?;
    assert_eq!(leads.len(), 1);
    let record = &leads[0]["record"];
    assert_eq!(record["service_type"], "job");
    assert_eq!(record["contact_name"], "Hugo Roche");
    assert_eq!(record["form_data"]["Âge"], "31");
    assert_eq!(record["form_data"]["Info CV"], "Non renseigné");
    Ok(())
}

#[test]
fn solar_resubmission_refreshes_the_existing_lead() -> TestResult {
    let workspace = TempDir::new()?;
    let store = workspace.path().join("leads.json");
    let base = json!({
        "phase": "Monophasé",
        "tva": "10%",
        "buildingAge": "2 à 15 ans",
        "roofType": "Tuiles",
        "orientation": "Sud",
        "inclination": "30-45°",
        "name": "Lambert",
        "phone": "0677889900"
    });

    for kwh in ["3200", "5400"] {
        let mut answers = base.clone();
        answers["kwh"] = json!(kwh);
        let path = write_answers(workspace.path(), "solaire.json", answers)?;
        leadwiz(workspace.path())?
            .args(["submit", "--service", "solaire", "--answers"])
            .arg(&path)
            .arg("--store")
            .arg(&store)
            .assert()
            .success();
    }

    let leads = stored_leads(workspace.path(), &store)?;
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0]["record"]["form_data"]["kwh"], "5400");
    Ok(())
}

#[test]
fn incomplete_answers_fail_without_writing() -> TestResult {
    let workspace = TempDir::new()?;
    let store = workspace.path().join("leads.json");
    let answers = write_answers(
        workspace.path(),
        "callback.json",
        json!({ "name": "Chevalier", "phone": "0611223344" }),
    )?;

    let output = leadwiz(workspace.path())?
        .args(["submit", "--service", "callback", "--answers"])
        .arg(&answers)
        .arg("--store")
        .arg(&store)
        .output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains("missing: email"));
    assert!(!store.exists());
    Ok(())
}

#[test]
fn wizard_collects_callback_request_from_stdin() -> TestResult {
    let workspace = TempDir::new()?;
    let store = workspace.path().join("leads.json");
    let output = leadwiz(workspace.path())?
        .args(["wizard", "--service", "callback", "--store"])
        .arg(&store)
        .write_stdin("Chevalier\nchevalier@example.fr\n0611223344\n")
        .output()?;
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)?.contains("Merci !"));

    let leads = stored_leads(workspace.path(), &store)?;
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0]["table"], "callback_requests");
    assert_eq!(leads[0]["record"]["contact_email"], "chevalier@example.fr");
    Ok(())
}

#[test]
fn wizard_back_and_close_discard_answers() -> TestResult {
    let workspace = TempDir::new()?;
    let store = workspace.path().join("leads.json");
    let output = leadwiz(workspace.path())?
        .args(["wizard", "--service", "energie", "--store"])
        .arg(&store)
        .write_stdin("12 rue des Lilas\n2\n:back\n\n\n:close\n")
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Step 2/6"));
    assert_eq!(stdout.matches("Step 1/6").count(), 2);
    assert!(stdout.contains("nothing was sent"));
    assert!(!store.exists());
    Ok(())
}

#[test]
fn check_reports_invalid_definition() -> TestResult {
    let workspace = TempDir::new()?;
    let spec = write_answers(
        workspace.path(),
        "broken.json",
        json!({
            "id": "broken",
            "title": "Broken",
            "service_type": "telecom",
            "table": "quote_requests",
            "fields": [{ "id": "name", "title": "Nom" }, { "id": "phone", "title": "Téléphone" }],
            "steps": [],
            "contact": { "name": ["name"], "phone": "phone" }
        }),
    )?;

    let output = leadwiz(workspace.path())?
        .arg("check")
        .arg("--spec")
        .arg(&spec)
        .output()?;
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Validation result: invalid"));
    assert!(stdout.contains("no_steps"));
    Ok(())
}

#[test]
fn check_accepts_builtin_definition() -> TestResult {
    let workspace = TempDir::new()?;
    let output = leadwiz(workspace.path())?
        .args(["describe", "--service", "telecom"])
        .output()?;
    let spec = workspace.path().join("telecom.json");
    fs::write(&spec, output.stdout)?;

    leadwiz(workspace.path())?
        .arg("check")
        .arg("--spec")
        .arg(&spec)
        .assert()
        .success();
    Ok(())
}

#[test]
fn leads_lists_tables_of_custom_definitions() -> TestResult {
    let workspace = TempDir::new()?;
    let store = workspace.path().join("leads.json");
    let spec = write_answers(
        workspace.path(),
        "salon.json",
        json!({
            "id": "salon-rappel",
            "title": "Rappel salon",
            "service_type": "callback",
            "table": "salon_leads",
            "write_policy": { "mode": "insert" },
            "fields": [{ "id": "name", "title": "Nom" }, { "id": "phone", "title": "Téléphone" }],
            "steps": [{ "id": "who", "title": "Qui", "fields": ["name", "phone"], "required": ["name", "phone"] }],
            "contact": { "name": ["name"], "phone": "phone" }
        }),
    )?;
    let answers = write_answers(
        workspace.path(),
        "answers.json",
        json!({ "name": "Perrin", "phone": "0644332211" }),
    )?;

    leadwiz(workspace.path())?
        .args(["submit", "--service", "callback", "--spec"])
        .arg(&spec)
        .arg("--answers")
        .arg(&answers)
        .arg("--store")
        .arg(&store)
        .assert()
        .success();

    let leads = stored_leads(workspace.path(), &store)?;
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0]["table"], "salon_leads");
    Ok(())
}
