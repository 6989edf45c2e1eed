//! CLI integration tests
//!
//! ## Exit Code Contract
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Workbook exported (or sheets listed) |
//! | 1 | Failure: unreadable input, bad config, save error |
//! | 2 | Nothing to export after filtering |

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Run the CLI and return (exit_code, stdout, stderr)
fn run(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_attar"))
        .args(args)
        .env_remove("ATTAR_CONFIG")
        .output()
        .expect("failed to execute attar");

    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

fn fixture(name: &str) -> String {
    fixtures_dir().join(name).display().to_string()
}

fn xlsx_files(dir: &std::path::Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".xlsx"))
        .collect()
}

// =============================================================================
// export
// =============================================================================

#[test]
fn export_writes_workbook_and_exits_0() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().display().to_string();
    let (code, stdout, stderr) = run(&[
        "export",
        "sales",
        &fixture("sales.json"),
        "-o",
        &out,
        "--as-of",
        "2026-10-18",
        "--period",
        "weekly",
    ]);

    assert_eq!(code, 0, "stderr: {stderr}");
    let files = xlsx_files(dir.path());
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("Sales_Report_weekly_"), "{}", files[0]);
    assert!(stdout.contains("Performance Metrics"));
}

#[test]
fn filtered_out_export_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().display().to_string();
    let (code, _, stderr) = run(&[
        "export",
        "sales",
        &fixture("sales.json"),
        "-o",
        &out,
        "--category",
        "Bakhoor",
    ]);

    assert_eq!(code, 2);
    assert!(stderr.contains("No sales data available to export"));
    assert!(xlsx_files(dir.path()).is_empty());
}

#[test]
fn empty_payload_exits_2_with_json_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().display().to_string();
    let (code, stdout, _) = run(&["export", "sales", &fixture("empty.json"), "-o", &out, "--json"]);

    assert_eq!(code, 2);
    let outcome: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(outcome, serde_json::json!("nothing-to-export"));
}

#[test]
fn missing_input_exits_1() {
    let (code, _, stderr) = run(&["export", "sales", &fixture("missing.json")]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Failed to read"));
}

#[test]
fn unknown_kind_is_rejected() {
    let (code, _, stderr) = run(&["export", "ledger", &fixture("sales.json")]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown report kind"));
}

#[test]
fn stdin_input_with_currency_override() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().display().to_string();
    let json = std::fs::read(fixtures_dir().join("sales.json")).unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_attar"))
        .args(["export", "sales", "-", "-o", &out, "--currency", "$"])
        .env_remove("ATTAR_CONFIG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&json).unwrap();
    let status = child.wait().unwrap();

    assert_eq!(status.code(), Some(0));
    assert_eq!(xlsx_files(dir.path()).len(), 1);
}

#[test]
fn config_file_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().display().to_string();
    let (code, stdout, stderr) = run(&[
        "--config",
        &fixture("attar.toml"),
        "export",
        "sales",
        &fixture("sales.json"),
        "-o",
        &out,
        "--json",
    ]);

    assert_eq!(code, 0, "stderr: {stderr}");
    let outcome: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(outcome["exported"]["kind"], "sales");
    assert_eq!(outcome["exported"]["sheets"][0]["name"], "Executive Summary");
}

#[test]
fn malformed_config_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "near_expiry_days = \"soon\"\n").unwrap();
    let out = dir.path().display().to_string();
    let (code, _, stderr) = run(&[
        "--config",
        &config.display().to_string(),
        "export",
        "sales",
        &fixture("sales.json"),
        "-o",
        &out,
    ]);

    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid config"));
    assert!(xlsx_files(dir.path()).is_empty());
}

// =============================================================================
// sheets
// =============================================================================

#[test]
fn sheets_lists_canonical_order() {
    let (code, stdout, _) = run(&["sheets", "daily-sales"]);
    assert_eq!(code, 0);
    let names: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        names,
        vec![
            "Executive Summary",
            "Invoice Details",
            "Product Performance",
            "Category Analysis",
            "Hourly Analysis",
            "Customer Analysis",
        ]
    );
}

#[test]
fn sheets_with_payload_prints_headers() {
    let (code, stdout, _) = run(&["sheets", "sales", &fixture("sales.json")]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Payment Method | Transactions | Amount"));
}

#[test]
fn sheets_without_kind_lists_every_report() {
    let (code, stdout, _) = run(&["sheets"]);
    assert_eq!(code, 0);
    for kind in ["inventory", "sales", "purchase", "category", "trending", "daily-sales"] {
        assert!(stdout.lines().any(|line| line == kind), "missing {kind}");
    }
    assert!(stdout.contains("  Strategic Recommendations"));
}
