// The cargo_bin! macro requires build script setup that's overkill for simple tests.
// Suppress deprecation warning on the function until we need custom build-dir support.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

// 2028-01-01T00:00:00Z
const BASELINE_MS: i64 = 1_830_297_600_000;

fn ixecon() -> Command {
    Command::new(cargo_bin("ixecon"))
}

fn json_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

fn countries_file() -> NamedTempFile {
    json_file(&format!(
        r#"[
  {{
    "id": "urcea",
    "name": "Urcea",
    "baseline": {{
      "population": 72000000.0,
      "gdp_per_capita": 48000.0,
      "unemployment_rate": 0.04,
      "inflation_rate": 0.02
    }},
    "baseline_time": {BASELINE_MS},
    "tier_table_version": 1,
    "government": ["rule_of_law", "independent_judiciary"]
  }},
  {{
    "id": "kiravia",
    "name": "Kiravia",
    "baseline": {{
      "population": 45000000.0,
      "gdp_per_capita": 9000.0,
      "unemployment_rate": 0.08,
      "inflation_rate": 0.04
    }},
    "baseline_time": {BASELINE_MS},
    "tier_table_version": 1
  }},
  {{
    "id": "stale",
    "name": "Stale",
    "baseline": {{
      "population": 1000000.0,
      "gdp_per_capita": 20000.0,
      "unemployment_rate": 0.05,
      "inflation_rate": 0.02
    }},
    "baseline_time": {BASELINE_MS},
    "tier_table_version": 4
  }}
]"#
    ))
}

#[test]
fn test_help_lists_subcommands() {
    ixecon()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("recalc"))
        .stdout(predicate::str::contains("project"));
}

#[test]
fn test_now_at_ixtime_epoch() {
    ixecon()
        .args(["now", "--real", "2020-10-04T00:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("IxTime:     2028-01-01T00:00:00Z"));
}

#[test]
fn test_now_rejects_bad_timestamp() {
    ixecon()
        .args(["now", "--real", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("yesterday"));
}

#[test]
fn test_cagr_doubling() {
    ixecon()
        .args(["cagr", "--from", "100", "--to", "200", "--years", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CAGR: 100.0000%"));
}

#[test]
fn test_cagr_zero_years_fails() {
    ixecon()
        .args(["cagr", "--from", "100", "--to", "200", "--years", "0"])
        .assert()
        .failure();
}

#[test]
fn test_target_already_reached() {
    ixecon()
        .args(["target", "--current", "500", "--target", "400", "--rate", "0.03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Years to target: 0.00"));
}

#[test]
fn test_recalc_reports_results_and_skips_stale() {
    let countries = countries_file();
    ixecon()
        .arg("recalc")
        .arg("--countries")
        .arg(countries.path())
        .args(["--at", "2031-06-01T00:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("urcea"))
        .stdout(predicate::str::contains("kiravia"))
        .stdout(predicate::str::contains("Tier 3"))
        .stdout(predicate::str::contains("stale").and(predicate::str::contains("SKIPPED")));
}

#[test]
fn test_recalc_json_report() {
    let countries = countries_file();
    let output = ixecon()
        .arg("recalc")
        .arg("--countries")
        .arg(countries.path())
        .args(["--at", "2030-01-01T00:00:00Z", "--json"])
        .output()
        .expect("failed to execute");
    assert!(output.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(report["results"].as_array().map(Vec::len), Some(2));
    assert_eq!(report["skipped"][0]["country"], "stale");
    assert_eq!(report["cancelled"], false);
}

#[test]
fn test_recalc_invalid_config_fails() {
    let countries = countries_file();
    let config = json_file(r#"{ "growth_floor": 0.2 }"#);
    ixecon()
        .arg("recalc")
        .arg("--countries")
        .arg(countries.path())
        .arg("--config")
        .arg(config.path())
        .args(["--at", "2030-01-01T00:00:00Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("growth floor"));
}

#[test]
fn test_recalc_missing_file_fails() {
    ixecon()
        .args(["recalc", "--countries", "/nonexistent/countries.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nonexistent"));
}

#[test]
fn test_project_prints_trajectory_and_cagr() {
    let countries = countries_file();
    ixecon()
        .arg("project")
        .arg("--countries")
        .arg(countries.path())
        .args(["--country", "kiravia", "--to", "2031-01-01T00:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2028-01-01T00:00:00Z"))
        .stdout(predicate::str::contains("2031-01-01T00:00:00Z"))
        .stdout(predicate::str::contains("GDP per capita CAGR"));
}

#[test]
fn test_project_unknown_country_fails() {
    let countries = countries_file();
    ixecon()
        .arg("project")
        .arg("--countries")
        .arg(countries.path())
        .args(["--country", "atlantis", "--to", "2031-01-01T00:00:00Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_rust_log_env_configures_logging() {
    let countries = countries_file();
    ixecon()
        .env("RUST_LOG", "debug")
        .arg("recalc")
        .arg("--countries")
        .arg(countries.path())
        .args(["--at", "2030-01-01T00:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tax x1.000"))
        .stderr(predicate::str::contains("Loaded 3 countries"));
}

#[test]
fn test_log_level_flag_overrides_rust_log() {
    let countries = countries_file();
    ixecon()
        .env("RUST_LOG", "debug")
        .args(["--log-level", "warn", "recalc", "--countries"])
        .arg(countries.path())
        .args(["--at", "2030-01-01T00:00:00Z"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Loaded 3 countries").not());
}
