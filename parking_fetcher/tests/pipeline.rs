mod common;

use common::{ScriptedSource, options, site, sites};
use parking_fetcher::error::{FetchError, PipelineError};
use parking_fetcher::pipeline::{run, run_with_source};
use reqwest::StatusCode;
use shared::datamall::QueryPoint;
use shared::error::ConfigError;
use shared::{Config, OutputConfig};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const CENTRAL: QueryPoint = QueryPoint::new(1.35, 103.82, 5.0);

fn output_in(dir: &TempDir) -> OutputConfig {
    OutputConfig {
        path: dir.path().join("data/bicycle-parking.json").display().to_string(),
        user_submitted_path: dir.path().join("data/user-submitted.json").display().to_string(),
    }
}

#[tokio::test]
async fn writes_unique_records_and_summarises() -> Result<(), PipelineError> {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = output_in(&dir);

    let mut records = sites("Blk", 3);
    records[2].shelter_indicator = "N".to_string();
    records[2].rack_type = "MRT_RACKS".to_string();
    let mut pages = vec![records.clone()];
    pages.push(vec![records[0].clone(), site("Park connector", 1.36, 103.83)]);
    let source = ScriptedSource::new().with_pages(CENTRAL, pages);

    let summary = run_with_source(&source, &[CENTRAL], &options(20), &output).await?;

    assert_eq!(summary.total, 4);
    assert_eq!(summary.sheltered, 3);
    assert_eq!(summary.sheltered_percent, 75);
    assert_eq!(summary.unsheltered_percent, 25);
    assert_eq!(summary.rack_types, ["HDB_RACKS", "MRT_RACKS"]);

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output.path).expect("output exists"))
            .expect("valid json");
    let written = written.as_array().expect("top-level array");
    assert_eq!(written.len(), 4);
    assert_eq!(written[3]["Description"], "Park connector");
    assert!(written[0].get("isUserSubmitted").is_none());
    Ok(())
}

#[tokio::test]
async fn upstream_error_leaves_previous_output_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = output_in(&dir);
    fs::create_dir_all(dir.path().join("data")).expect("data dir");
    fs::write(&output.path, "[]").expect("seed previous output");

    let source = ScriptedSource::new()
        .with_pages(CENTRAL, vec![sites("Blk", 2)])
        .failing_with(StatusCode::INTERNAL_SERVER_ERROR);

    let err = run_with_source(&source, &[CENTRAL], &options(20), &output)
        .await
        .expect_err("run should fail");

    assert!(matches!(err, PipelineError::Fetch(FetchError::Upstream { .. })));
    assert_eq!(fs::read_to_string(&output.path).expect("still there"), "[]");
}

#[tokio::test]
async fn user_submitted_file_is_optional_and_not_written_into_output() -> Result<(), PipelineError> {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = output_in(&dir);
    fs::create_dir_all(dir.path().join("data")).expect("data dir");
    fs::write(
        &output.user_submitted_path,
        r#"[{"Description": "Office lobby", "Latitude": 1.28, "Longitude": 103.85,
             "RackType": "OTHER", "RackCount": 24, "ShelterIndicator": "Y"}]"#,
    )
    .expect("seed user-submitted");

    let source = ScriptedSource::new().with_pages(CENTRAL, vec![sites("Blk", 2)]);
    let summary = run_with_source(&source, &[CENTRAL], &options(20), &output).await?;

    assert_eq!(summary.total, 2);
    let written = fs::read_to_string(&output.path).expect("output exists");
    assert!(!written.contains("Office lobby"));
    Ok(())
}

#[tokio::test]
async fn missing_credential_fails_before_any_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config {
        output: output_in(&dir),
        ..Config::default()
    };

    let err = run(&config).await.expect_err("run should fail");

    assert!(matches!(err, PipelineError::Config(ConfigError::MissingCredential)));
    assert!(!Path::new(&config.output.path).exists());
}

#[test]
fn binary_exits_non_zero_without_credential() {
    let dir = tempfile::tempdir().expect("tempdir");

    let out = Command::new(env!("CARGO_BIN_EXE_parking_fetcher"))
        .current_dir(dir.path())
        .env_remove(shared::API_KEY_ENV_VAR)
        .env_remove("BICYCLE_PARKING_DATAMALL__ACCOUNT_KEY")
        .output()
        .expect("binary runs");

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("LTA_API_KEY environment variable is required"));
    assert!(!dir.path().join("src").exists());
}
