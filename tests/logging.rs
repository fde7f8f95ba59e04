use std::fs;

use terraform_provider_octopusdeploy::LogFormat;
use terraform_provider_octopusdeploy::telemetry::{self, LogSettings};

#[test]
fn json_logs_go_to_the_requested_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tf").join("octopus.log");
    let settings = LogSettings {
        level: Some("DEBUG".into()),
        format: LogFormat::Json,
        file: Some(path.clone()),
    };

    telemetry::init(&settings).expect("install subscriber");
    tracing::info!(space_id = "Spaces-1", "provider configured");
    tracing::trace!("filtered out");

    let contents = fs::read_to_string(&path).expect("read log file");
    let line = contents.lines().next().expect("one log line");
    let record: serde_json::Value = serde_json::from_str(line).expect("json log line");
    assert_eq!(record["fields"]["message"], "provider configured");
    assert_eq!(record["fields"]["space_id"], "Spaces-1");
    assert_eq!(contents.lines().count(), 1);

    let again = telemetry::init(&settings);
    assert!(again.is_err(), "a second subscriber must be rejected");
}
