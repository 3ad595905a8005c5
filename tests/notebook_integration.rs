//! Cross-module integration: notebook store driven together with the
//! analyzer and activity log, plus smoke tests of the installed `sln`
//! binary through the shared harness.

mod common;

use std::fs;

use serde_json::Value;
use tempfile::TempDir;

use common::{run_cli_case, run_cli_case_env};
use seclab_notebook::prelude::*;

#[test]
fn full_session_flow_records_everything() {
    let notebook = Notebook::new();
    let engine = AnalyzerEngine::from_defaults().expect("default engine builds");

    let service = notebook.add_service(ServiceDraft {
        kind: ServiceKind::Ssh,
        title: "OpenSSH on target".to_string(),
        description: "port 22, banner OpenSSH_9.6".to_string(),
        commands: "nmap -p22 -sV 10.0.0.20".to_string(),
        notes: String::new(),
    });
    let attack = notebook.add_attack(AttackDraft {
        kind: AttackKind::SshBruteForce,
        title: "hydra run against ssh".to_string(),
        description: "rockyou top 1k".to_string(),
        results: "no valid credentials".to_string(),
        notes: String::new(),
    });

    let content = "sshd[4]: Failed password for root from 10.0.0.9\n".repeat(30);
    let artifact = notebook.add_artifact(ArtifactDraft {
        filename: "auth.log".to_string(),
        file_type: FileType::Log,
        content: content.into_bytes(),
        notes: "pulled from target after hydra run".to_string(),
        related_service: Some(service.id.clone()),
        related_attack: Some(attack.id.clone()),
    });

    let result = notebook.analyze(&engine, &artifact.id).expect("analysis runs");
    assert_eq!(result.artifact_id, artifact.id);
    assert_eq!(result.severity, Severity::High);

    assert_eq!(notebook.services().len(), 1);
    assert_eq!(notebook.attacks().len(), 1);
    assert_eq!(notebook.artifacts().len(), 1);
    assert_eq!(notebook.results().len(), 1);

    // Deleting the artifact drops its analysis results with it.
    notebook.delete_artifact(&artifact.id).expect("artifact exists");
    assert!(notebook.results().is_empty());
    assert!(matches!(
        notebook.analyze(&engine, &artifact.id),
        Err(SlnError::UnknownRecord { .. })
    ));
}

#[test]
fn activity_log_captures_analysis_events() {
    let dir = TempDir::new().expect("temp dir");
    let log_path = dir.path().join("activity.jsonl");
    let mut writer = JsonlWriter::open(JsonlConfig {
        path: Some(log_path.clone()),
        ..JsonlConfig::default()
    });

    writer.write_entry(&LogEntry::new(EventType::SessionStart, EventLevel::Info));
    let mut entry = LogEntry::new(EventType::AnalysisComplete, EventLevel::Warning);
    entry.filename = Some("auth.log".to_string());
    entry.severity = Some(Severity::High);
    writer.write_entry(&entry);
    writer.flush();

    let raw = fs::read_to_string(&log_path).expect("log written");
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(lines.len(), 2);
    let parsed: Value = serde_json::from_str(lines[1]).expect("valid JSONL");
    assert_eq!(parsed["event"], "analysis_complete");
    assert_eq!(parsed["severity"], "high");
    assert_eq!(parsed["filename"], "auth.log");
}

#[test]
fn cli_help_names_the_binary() {
    let res = run_cli_case("help", &["--help"]);
    assert!(res.status.success(), "stderr: {}", res.stderr);
    assert!(res.stdout.contains("Usage: sln"));
    assert!(res.stdout.contains("analyze"));
}

#[test]
fn cli_analyze_emits_json_lines() {
    let dir = TempDir::new().expect("temp dir");
    let log_file = dir.path().join("sshd.log");
    fs::write(&log_file, "Failed password for root from 10.0.0.3\n".repeat(25))
        .expect("write sample log");

    let res = run_cli_case(
        "analyze-json",
        &["analyze", "--json", log_file.to_str().expect("utf8 path")],
    );
    assert!(res.status.success(), "stderr: {}", res.stderr);

    let line = res.stdout.lines().next().expect("one JSON line");
    let parsed: Value = serde_json::from_str(line).expect("valid JSON output");
    assert_eq!(parsed["artifact"]["filename"], "sshd.log");
    assert_eq!(parsed["artifact"]["fileType"], "log");
    assert_eq!(parsed["result"]["severity"], "high");
    assert_eq!(parsed["result"]["findings"]["failedLogins"], 25);
}

#[test]
fn cli_analyze_respects_forced_file_type() {
    let dir = TempDir::new().expect("temp dir");
    let file = dir.path().join("notes.log");
    fs::write(&file, "just some notes\n").expect("write sample file");

    let res = run_cli_case(
        "analyze-forced-type",
        &[
            "analyze",
            "--json",
            "--file-type",
            "other",
            file.to_str().expect("utf8 path"),
        ],
    );
    assert!(res.status.success(), "stderr: {}", res.stderr);
    let parsed: Value =
        serde_json::from_str(res.stdout.lines().next().expect("output")).expect("valid JSON");
    assert_eq!(parsed["artifact"]["fileType"], "other");
    assert_eq!(parsed["result"]["analysisType"], "other_analysis");
}

#[test]
fn cli_analyze_missing_file_is_a_runtime_error() {
    let res = run_cli_case("analyze-missing", &["analyze", "/nonexistent/never.log"]);
    assert_eq!(res.status.code(), Some(2), "stderr: {}", res.stderr);
    assert!(res.stderr.contains("cannot read"));
}

#[test]
fn cli_analyze_partial_failure_exits_four() {
    let dir = TempDir::new().expect("temp dir");
    let good = dir.path().join("ok.log");
    fs::write(&good, "service started\n").expect("write sample log");

    let res = run_cli_case(
        "analyze-partial",
        &[
            "analyze",
            "--json",
            good.to_str().expect("utf8 path"),
            "/nonexistent/never.log",
        ],
    );
    assert_eq!(res.status.code(), Some(4), "stderr: {}", res.stderr);
    // The readable file was still analyzed and printed.
    assert!(res.stdout.lines().next().is_some());
}

#[test]
fn cli_config_validate_and_show() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[analyzer]\nbrute_force_threshold = 9\n",
    )
    .expect("write config");

    let res = run_cli_case(
        "config-validate",
        &["--config", config_path.to_str().expect("utf8 path"), "config", "validate"],
    );
    assert!(res.status.success(), "stderr: {}", res.stderr);

    let res = run_cli_case(
        "config-show-json",
        &["--config", config_path.to_str().expect("utf8 path"), "--json", "config", "show"],
    );
    assert!(res.status.success(), "stderr: {}", res.stderr);
    let parsed: Value = serde_json::from_str(res.stdout.trim()).expect("valid JSON");
    assert_eq!(parsed["analyzer"]["brute_force_threshold"], 9);
    // Untouched keys fall back to defaults.
    assert_eq!(parsed["analyzer"]["dhcp_storm_threshold"], 100);
}

#[test]
fn cli_config_rejects_invalid_thresholds() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[analyzer]\nmedium_login_threshold = 50\nhigh_login_threshold = 20\n",
    )
    .expect("write config");

    let res = run_cli_case(
        "config-invalid",
        &["--config", config_path.to_str().expect("utf8 path"), "config", "validate"],
    );
    assert_eq!(res.status.code(), Some(1), "stderr: {}", res.stderr);
    assert!(res.stderr.contains("SLN-1001"), "stderr: {}", res.stderr);
}

#[test]
fn cli_env_overrides_beat_the_config_file() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[analyzer]\ndhcp_storm_threshold = 200\n").expect("write config");

    let res = run_cli_case_env(
        "config-env-override",
        &["--config", config_path.to_str().expect("utf8 path"), "--json", "config", "show"],
        &[
            ("SLN_ANALYZER_DHCP_STORM_THRESHOLD", "7"),
            ("SLN_ANALYZER_NXDOMAIN_THRESHOLD", "9"),
        ],
    );
    assert!(res.status.success(), "stderr: {}", res.stderr);
    let parsed: Value = serde_json::from_str(res.stdout.trim()).expect("valid JSON");
    assert_eq!(parsed["analyzer"]["dhcp_storm_threshold"], 7, "env beats file");
    assert_eq!(parsed["analyzer"]["nxdomain_threshold"], 9, "env beats default");
    assert_eq!(parsed["analyzer"]["brute_force_threshold"], 50, "untouched keys keep defaults");
}

#[test]
fn cli_env_override_with_garbage_value_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "").expect("write config");

    let res = run_cli_case_env(
        "config-env-garbage",
        &["--config", config_path.to_str().expect("utf8 path"), "config", "validate"],
        &[("SLN_ANALYZER_NXDOMAIN_THRESHOLD", "lots")],
    );
    assert_eq!(res.status.code(), Some(1), "stderr: {}", res.stderr);
    assert!(res.stderr.contains("SLN-1001"), "stderr: {}", res.stderr);
    assert!(
        res.stderr.contains("SLN_ANALYZER_NXDOMAIN_THRESHOLD"),
        "stderr should name the offending variable: {}",
        res.stderr
    );
}

#[test]
fn cli_empty_activity_log_env_unsets_the_configured_path() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[paths]\nactivity_log = \"/tmp/never-used.jsonl\"\n",
    )
    .expect("write config");

    let res = run_cli_case_env(
        "config-env-unset-log",
        &["--config", config_path.to_str().expect("utf8 path"), "--json", "config", "show"],
        &[("SLN_ACTIVITY_LOG", "")],
    );
    assert!(res.status.success(), "stderr: {}", res.stderr);
    let parsed: Value = serde_json::from_str(res.stdout.trim()).expect("valid JSON");
    assert!(
        parsed["paths"]["activity_log"].is_null(),
        "empty SLN_ACTIVITY_LOG must disable logging, got {}",
        parsed["paths"]["activity_log"]
    );
}

#[test]
fn cli_activity_log_env_enables_logging() {
    let dir = TempDir::new().expect("temp dir");
    let log_file = dir.path().join("ok.log");
    fs::write(&log_file, "service started\n").expect("write sample log");
    let activity_path = dir.path().join("activity.jsonl");

    let res = run_cli_case_env(
        "analyze-env-activity-log",
        &["analyze", "--json", log_file.to_str().expect("utf8 path")],
        &[("SLN_ACTIVITY_LOG", activity_path.to_str().expect("utf8 path"))],
    );
    assert!(res.status.success(), "stderr: {}", res.stderr);

    let raw = fs::read_to_string(&activity_path).expect("activity log written");
    let events: Vec<Value> = raw
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid JSONL"))
        .collect();
    assert_eq!(events[0]["event"], "session_start");
    assert!(events.iter().any(|e| e["event"] == "artifact_ingest"));
    assert!(events.iter().any(|e| e["event"] == "analysis_complete"));
}

#[test]
fn cli_explicit_missing_config_is_a_user_error() {
    let res = run_cli_case(
        "config-missing",
        &["--config", "/nonexistent/sln.toml", "config", "validate"],
    );
    assert_eq!(res.status.code(), Some(1), "stderr: {}", res.stderr);
    assert!(res.stderr.contains("SLN-1002"), "stderr: {}", res.stderr);
}

#[test]
fn cli_completions_generate_a_script() {
    let res = run_cli_case("completions", &["completions", "bash"]);
    assert!(res.status.success(), "stderr: {}", res.stderr);
    assert!(res.stdout.contains("sln"));
}
