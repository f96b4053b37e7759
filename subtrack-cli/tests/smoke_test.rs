//! Smoke tests for subtrack-cli
//!
//! These tests drive the built binary against a throwaway data directory.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn subtrack(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_subtrack"))
        .args(args)
        .env("SUBTRACK_DATA_DIR", data_dir)
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn combined(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

/// Test that the CLI can show help
#[test]
fn test_cli_help() {
    let temp_dir = TempDir::new().unwrap();
    let output = subtrack(temp_dir.path(), &["--help"]);

    let text = stdout(&output);
    assert!(output.status.success());
    for command in ["list", "add", "quick-add", "remove", "stats", "reminders", "settings"] {
        assert!(text.contains(command), "Help should mention '{}'", command);
    }
}

/// Test that version is shown
#[test]
fn test_cli_version() {
    let temp_dir = TempDir::new().unwrap();
    let output = subtrack(temp_dir.path(), &["--version"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("subtrack"));
}

#[test]
fn test_list_empty() {
    let temp_dir = TempDir::new().unwrap();
    let output = subtrack(temp_dir.path(), &["list"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("No subscriptions yet"));
    assert!(text.contains("0.00"));
}

#[test]
fn test_add_persists_across_runs() {
    let temp_dir = TempDir::new().unwrap();

    let output = subtrack(
        temp_dir.path(),
        &["add", "Netflix", "15.99", "--category", "streaming"],
    );
    assert!(output.status.success(), "{}", combined(&output));
    assert!(temp_dir.path().join("%40subscriptions.json").exists());

    let output = subtrack(temp_dir.path(), &["list"]);
    let text = stdout(&output);
    assert!(text.contains("Netflix"));
    assert!(text.contains("15.99"));
}

#[test]
fn test_add_with_missing_fields_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = subtrack(temp_dir.path(), &["add", "", "15.99"]);

    assert!(!output.status.success());
    assert!(combined(&output).contains("Please fill in all required fields"));
    assert!(!temp_dir.path().join("%40subscriptions.json").exists());
}

#[test]
fn test_quick_add_and_stats_json() {
    let temp_dir = TempDir::new().unwrap();
    assert!(subtrack(temp_dir.path(), &["quick-add", "netflix"]).status.success());
    assert!(subtrack(temp_dir.path(), &["quick-add", "Spotify"]).status.success());

    let output = subtrack(temp_dir.path(), &["stats", "--json"]);
    assert!(output.status.success(), "{}", combined(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["subscriptionCount"], 2);
    assert_eq!(report["totalMonthly"].as_f64(), Some(25.98));

    let categories = report["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["name"], "streaming");
    assert_eq!(categories[0]["percentage"], 62);
    assert_eq!(categories[1]["name"], "music");
    assert_eq!(categories[1]["percentage"], 38);

    assert_eq!(report["mostExpensive"]["name"], "streaming");
    assert_eq!(report["mostExpensive"]["percentage"], 62);
}

#[test]
fn test_stats_most_expensive_when_empty() {
    let temp_dir = TempDir::new().unwrap();

    let output = subtrack(temp_dir.path(), &["stats", "--json"]);
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(report["mostExpensive"].is_null());

    let output = subtrack(temp_dir.path(), &["stats"]);
    assert!(stdout(&output).contains("Most expensive: N/A"));
}

#[test]
fn test_quick_add_unknown_service() {
    let temp_dir = TempDir::new().unwrap();
    let output = subtrack(temp_dir.path(), &["quick-add", "Hulu"]);

    assert!(!output.status.success());
    assert!(combined(&output).contains("Unknown service"));
}

#[test]
fn test_remove_unknown_id_is_harmless() {
    let temp_dir = TempDir::new().unwrap();
    assert!(subtrack(temp_dir.path(), &["quick-add", "Netflix"]).status.success());

    let output = subtrack(temp_dir.path(), &["remove", "does-not-exist"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No subscription with id"));

    let output = subtrack(temp_dir.path(), &["stats", "--json"]);
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["subscriptionCount"], 1);
}

#[test]
fn test_fresh_subscription_is_upcoming_within_a_month() {
    let temp_dir = TempDir::new().unwrap();
    assert!(subtrack(temp_dir.path(), &["quick-add", "Netflix"]).status.success());

    let output = subtrack(temp_dir.path(), &["reminders", "--days", "31", "--json"]);
    assert!(output.status.success(), "{}", combined(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["upcoming"].as_array().unwrap().len(), 1);
    assert!(report["overdue"].as_array().unwrap().is_empty());
}

#[test]
fn test_reminders_switched_off_need_explicit_days() {
    let temp_dir = TempDir::new().unwrap();
    assert!(subtrack(temp_dir.path(), &["quick-add", "Netflix"]).status.success());
    let output = subtrack(temp_dir.path(), &["settings", "set", "--reminders", "false"]);
    assert!(output.status.success(), "{}", combined(&output));

    let output = subtrack(temp_dir.path(), &["reminders", "--json"]);
    assert!(output.status.success(), "{}", combined(&output));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(report["upcoming"].as_array().unwrap().is_empty());
    assert!(report["overdue"].as_array().unwrap().is_empty());

    let text = stdout(&subtrack(temp_dir.path(), &["reminders"]));
    assert!(text.contains("turned off"));
    assert!(!text.contains("Netflix"));

    let output = subtrack(temp_dir.path(), &["reminders", "--days", "40", "--json"]);
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["upcoming"].as_array().unwrap().len(), 1);
    assert_eq!(report["upcoming"][0]["name"], "Netflix");
}

#[test]
fn test_settings_roundtrip() {
    let temp_dir = TempDir::new().unwrap();

    let output = subtrack(
        temp_dir.path(),
        &["settings", "set", "--reminders", "false", "--window-days", "14"],
    );
    assert!(output.status.success(), "{}", combined(&output));
    assert!(temp_dir.path().join("%40settings.json").exists());

    let text = stdout(&subtrack(temp_dir.path(), &["settings", "show"]));
    assert!(text.contains("off"));
    assert!(text.contains("14 days"));
}

#[test]
fn test_ephemeral_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("never-created");

    let output = subtrack(&data_dir, &["--ephemeral", "quick-add", "Netflix"]);
    assert!(output.status.success(), "{}", combined(&output));
    assert!(!data_dir.exists());
}
