//! The `moneymaker` binary end to end.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use regex::Regex;

fn moneymaker(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_moneymaker"))
        .args(args)
        .current_dir(home)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("run moneymaker")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    let output = moneymaker(home.path(), &["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Usage: moneymaker"));
    for command in ["score", "finalize", "history", "best", "clear", "verify"] {
        assert!(text.contains(command), "{command} missing from help");
    }
}

#[test]
fn score_prints_opening_status() {
    let home = tempfile::tempdir().unwrap();
    let output = moneymaker(home.path(), &["score"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Overall: 73  Lowest: Players Union (58)"));
    assert!(text.contains("Stability: warning"));
}

#[test]
fn finalize_stores_and_history_lists() {
    let home = tempfile::tempdir().unwrap();
    let history = home.path().join("results.json");
    let history_arg = history.to_str().unwrap();

    let state = home.path().join("deal.toml");
    fs::write(
        &state,
        "minSalary = 1000.0\nrevenueShare = 45.0\nstartTime = 1\nstreaming = 30.0\nsalaryShare = 52.0\n\n[allocation]\nplayers = 3.6\nowners = 2.8\nnetworks = 1.6\nleague = 0.0\n",
    )
    .unwrap();

    let output = moneymaker(
        home.path(),
        &[
            "--history",
            history_arg,
            "--json",
            "finalize",
            state.to_str().unwrap(),
            "--bonus",
            "5",
        ],
    );
    assert!(output.status.success(), "{output:?}");
    let result: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(result["success"], true);
    assert_eq!(result["tier"], "silver");
    assert_eq!(result["overall"], 82);
    let code = result["code"].as_str().unwrap().to_owned();
    assert!(Regex::new(r"^MLB-SILVER-[A-Z0-9]{6}-\d{4}$").unwrap().is_match(&code));
    assert!(history.exists());

    let listed = moneymaker(home.path(), &["--history", history_arg, "history"]);
    assert!(listed.status.success());
    assert!(stdout(&listed).contains(&code));

    let verified = moneymaker(home.path(), &["verify", &code]);
    assert!(verified.status.success());
    assert!(stdout(&verified).starts_with("Valid SILVER code from "));

    let cleared = moneymaker(home.path(), &["--history", history_arg, "clear"]);
    assert!(cleared.status.success());
    assert!(!history.exists());

    let best = moneymaker(home.path(), &["--history", history_arg, "best"]);
    assert_eq!(stdout(&best).trim(), "No results yet.");
}

#[test]
fn flags_outside_their_command_are_rejected() {
    let home = tempfile::tempdir().unwrap();
    let output = moneymaker(home.path(), &["score", "--bonus", "5"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--bonus"));

    let output = moneymaker(home.path(), &["score", "-v"]);
    assert!(!output.status.success());
    assert!(!home.path().join("-v").exists());
}

#[test]
fn verify_reports_json() {
    let home = tempfile::tempdir().unwrap();
    let output = moneymaker(home.path(), &["verify", "MLB-GOLD-JT4XJV-2025", "--json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["tier"], "gold");
    assert_eq!(value["hash"], "JT4XJV");
    assert_eq!(value["year"], 2025);
}

#[test]
fn verify_rejects_malformed_codes() {
    let home = tempfile::tempdir().unwrap();
    let output = moneymaker(home.path(), &["verify", "MLB-FAIL-ABCDEF-2025"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid claim code"));
}

#[test]
fn logs_go_to_the_app_dir() {
    let home = tempfile::tempdir().unwrap();
    let output = moneymaker(home.path(), &["score"]);
    assert!(output.status.success());
    assert!(
        home.path()
            .join(".moneymaker")
            .join("logs")
            .join("moneymaker.log")
            .exists()
    );
}
