//! Integration tests for the Replacer CLI
//!
//! These tests run the actual CLI binary and verify output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get the binary to test
#[allow(deprecated)]
fn replacer_cmd() -> Command {
    Command::cargo_bin("replacer").unwrap()
}

#[test]
fn test_help_flag() {
    replacer_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Placeholder substitution with pluggable processors",
        ));
}

// ============================================================================
// render
// ============================================================================

#[test]
fn test_render_with_set() {
    replacer_cmd()
        .args(["render", "Hello {{name|upper}}!", "--set", "name=world"])
        .assert()
        .success()
        .stdout("Hello WORLD!\n");
}

#[test]
fn test_render_many_templates_in_order() {
    replacer_cmd()
        .args(["render", "{{a}}", "{{b}}", "-s", "a=1", "-s", "b=2"])
        .assert()
        .success()
        .stdout("1\n2\n");
}

#[test]
fn test_render_from_json_vars() {
    let temp_dir = TempDir::new().unwrap();
    let vars_file = temp_dir.path().join("vars.json");
    fs::write(&vars_file, r#"{"price": "1234.5", "count": 3}"#).unwrap();

    replacer_cmd()
        .args([
            "render",
            "{{price|number:1,.,_}} [{{count}}]",
            "--vars",
            vars_file.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout("1_234.5 []\n");
}

#[test]
fn test_render_from_yaml_vars_with_override() {
    let temp_dir = TempDir::new().unwrap();
    let vars_file = temp_dir.path().join("vars.yaml");
    fs::write(&vars_file, "first: ada\nlast: lovelace\n").unwrap();

    replacer_cmd()
        .args([
            "render",
            "{{first|capitalize}} {{last|capitalize}}",
            "--vars",
            vars_file.to_str().unwrap(),
            "--set",
            "last=BYRON",
        ])
        .assert()
        .success()
        .stdout("Ada Byron\n");
}

#[test]
fn test_render_reads_stdin() {
    replacer_cmd()
        .args(["render", "--set", "x=42"])
        .write_stdin("value={{x}}\n")
        .assert()
        .success()
        .stdout("value=42\n");
}

#[test]
fn test_render_with_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("replacer.yaml");
    fs::write(&config_file, "date:\n  format: \"%Y\"\n").unwrap();

    replacer_cmd()
        .args([
            "--config",
            config_file.to_str().unwrap(),
            "render",
            "{{d|date}}",
            "--set",
            "d=2031-01-02",
        ])
        .assert()
        .success()
        .stdout("2031\n");
}

#[test]
fn test_render_unterminated_tag_verbatim() {
    replacer_cmd()
        .args(["render", "{{x", "--set", "x=1"])
        .assert()
        .success()
        .stdout("{{x\n");
}

// ============================================================================
// errors
// ============================================================================

#[test]
fn test_bad_assignment_fails_with_fix() {
    replacer_cmd()
        .args(["render", "{{x}}", "--set", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid assignment"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_vars_must_be_object() {
    let temp_dir = TempDir::new().unwrap();
    let vars_file = temp_dir.path().join("vars.json");
    fs::write(&vars_file, "[1, 2]").unwrap();

    replacer_cmd()
        .args(["render", "{{x}}", "--vars", vars_file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be an object"));
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("replacer.yaml");
    fs::write(&config_file, "currency:\n  locale: xx_YY\n").unwrap();

    replacer_cmd()
        .args(["--config", config_file.to_str().unwrap(), "processors"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("currency.locale"));
}

#[test]
fn test_missing_vars_file() {
    replacer_cmd()
        .args(["render", "{{x}}", "--vars", "/nonexistent/vars.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/vars.json"));
}

// ============================================================================
// parse / processors
// ============================================================================

#[test]
fn test_parse_lists_tags() {
    replacer_cmd()
        .args(["parse", "{{a:1,2|number:2}} and {{b}}"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 tags"))
        .stdout(predicate::str::contains("args=[1, 2]"))
        .stdout(predicate::str::contains("number"));
}

#[test]
fn test_parse_no_tags() {
    replacer_cmd()
        .args(["parse", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no tags"));
}

#[test]
fn test_processors_lists_builtins() {
    replacer_cmd()
        .arg("processors")
        .assert()
        .success()
        .stdout(predicate::str::contains("capitalize"))
        .stdout(predicate::str::contains("currency"))
        .stdout(predicate::str::contains("date"))
        .stdout(predicate::str::contains("number"));
}
