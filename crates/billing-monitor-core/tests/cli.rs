use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn run(dir: &Path, args: &[&str], envs: &[(&str, &str)]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_billing-monitor"))
        .args(args)
        .current_dir(dir)
        .env_clear()
        .envs(envs.iter().copied())
        .output()
        .unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_synth_without_slack_ids_fails_and_writes_nothing() {
    let dir = TempDir::new().unwrap();

    let output = run(dir.path(), &["synth"], &[]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("SLACK_WORKSPACE_ID"), "{}", stderr(&output));
    assert!(!dir.path().join("cdk.out").exists());
}

#[test]
fn test_synth_without_channel_id_fails_and_writes_nothing() {
    let dir = TempDir::new().unwrap();

    let output = run(dir.path(), &["synth"], &[("SLACK_WORKSPACE_ID", "W1")]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("SLACK_CHANNEL_ID"), "{}", stderr(&output));
    assert!(!dir.path().join("cdk.out").exists());
}

#[test]
fn test_synth_writes_assembly() {
    let dir = TempDir::new().unwrap();

    let output = run(
        dir.path(),
        &["synth"],
        &[("SLACK_WORKSPACE_ID", "W1"), ("SLACK_CHANNEL_ID", "C1")],
    );

    assert!(output.status.success(), "{}", stderr(&output));
    let template = dir.path().join("cdk.out/BillingMonitor.template.json");
    let body = fs::read_to_string(template).unwrap();
    assert!(body.contains("\"SlackWorkspaceId\": \"W1\""));
    assert!(dir.path().join("cdk.out/manifest.json").exists());
}

#[test]
fn test_slack_ids_read_from_dotenv() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "SLACK_WORKSPACE_ID=W1\nSLACK_CHANNEL_ID=C1\n").unwrap();

    let output = run(dir.path(), &["synth", "--stdout"], &[]);

    assert!(output.status.success(), "{}", stderr(&output));
    let template: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let binding = template["Resources"]
        .as_object()
        .unwrap()
        .values()
        .find(|r| r["Type"] == "AWS::Chatbot::SlackChannelConfiguration")
        .unwrap();
    assert_eq!(binding["Properties"]["SlackChannelId"], "C1");
    assert!(!dir.path().join("cdk.out").exists());
}

#[test]
fn test_config_path_read_from_dotenv() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("monitor.toml"), "[stack]\nname = \"FromFile\"\n").unwrap();
    fs::write(
        dir.path().join(".env"),
        "BILLING_MONITOR_CONFIG=monitor.toml\nSLACK_WORKSPACE_ID=W1\nSLACK_CHANNEL_ID=C1\n",
    )
    .unwrap();

    let output = run(dir.path(), &["synth"], &[]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(dir.path().join("cdk.out/FromFile.template.json").exists());
}

#[test]
fn test_invalid_stack_name_writes_nothing() {
    let dir = TempDir::new().unwrap();

    let output = run(
        dir.path(),
        &["synth"],
        &[
            ("SLACK_WORKSPACE_ID", "W1"),
            ("SLACK_CHANNEL_ID", "C1"),
            ("BILLING_MONITOR__STACK__NAME", "../Escaped"),
        ],
    );

    assert!(!output.status.success());
    assert!(!dir.path().join("cdk.out").exists());
    assert!(!dir.path().join("Escaped.template.json").exists());
}

#[test]
fn test_list_json_counts_resources() {
    let dir = TempDir::new().unwrap();

    let output = run(
        dir.path(),
        &["list", "--format", "json"],
        &[("SLACK_WORKSPACE_ID", "W1"), ("SLACK_CHANNEL_ID", "C1")],
    );

    assert!(output.status.success(), "{}", stderr(&output));
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 16);
    assert_eq!(rows.iter().filter(|r| r["kind"] == "alarm").count(), 11);
}

#[test]
fn test_completions_ignore_broken_config() {
    let dir = TempDir::new().unwrap();

    let output = run(dir.path(), &["--config", "missing.toml", "completions", "bash"], &[]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("billing-monitor"));
}
