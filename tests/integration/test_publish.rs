//! Integration tests for `apkship publish`
//!
//! `sh` stands in for the Flutter tool, so these run on Unix only.

#![cfg(unix)]

use crate::helpers::{TestProject, run_apkship, stderr, stdout};
use anyhow::Result;

/// ship.toml with the given analyzer output and a build that writes out/app.apk
fn config_with_analyzer(analyzer_output: &str) -> String {
  format!(
    r#"
[app]
name = "OverTime"
asset_prefix = "overtime"

[paths]
artifact = "out/app.apk"

[github]
repo = "acme/overtime"

[analyze]
command = ["sh", "-c", "printf '{}'"]

[build]
command = ["sh", "-c", "echo building && mkdir -p out && printf apk > out/app.apk"]
cleanup_processes = []
"#,
    analyzer_output
  )
}

#[test]
fn test_check_clean() -> Result<()> {
  let project = TestProject::new("1.4.2+23")?;
  project.config(&config_with_analyzer("Analyzing overtime...\\nNo issues found!\\n"))?;

  let output = run_apkship(&project.path, &["publish", "--check"])?;
  let out = stdout(&output);

  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(out.contains("1.4.2 (Build: 23)"), "should print version: {}", out);
  assert!(out.contains("0 errors, 0 warnings, 0 infos"));
  Ok(())
}

#[test]
fn test_check_warnings_pass() -> Result<()> {
  let project = TestProject::new("1.4.2+23")?;
  project.config(&config_with_analyzer(
    "warning - Unused import - lib/a.dart:1:8 - unused_import\\n   info - Prefer const - lib/b.dart:2:3\\n",
  ))?;

  let output = run_apkship(&project.path, &["publish", "--check"])?;

  assert!(output.status.success(), "warnings must not fail the check");
  assert!(stdout(&output).contains("0 errors, 1 warnings, 1 infos"));
  Ok(())
}

#[test]
fn test_check_errors_fail() -> Result<()> {
  let project = TestProject::new("1.4.2+23")?;
  project.config(&config_with_analyzer(
    "  error - Undefined name foo - lib/main.dart:10:3\\nwarning - Dead code - lib/a.dart:9:1\\n",
  ))?;

  let output = run_apkship(&project.path, &["publish", "--check"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Analyzer reported 1 error(s) and 1 warning(s)"));
  Ok(())
}

#[test]
fn test_check_missing_tool() -> Result<()> {
  let project = TestProject::new("1.0.0+1")?;
  project.config(
    r#"
[analyze]
command = ["apkship-test-no-such-tool"]
"#,
  )?;

  let output = run_apkship(&project.path, &["publish", "--check"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Failed to run apkship-test-no-such-tool"));
  Ok(())
}

#[test]
fn test_build_then_skip_when_fresh() -> Result<()> {
  let project = TestProject::new("1.4.2+23")?;
  project.config(&config_with_analyzer(""))?;
  project.write_file("lib/main.dart", "void main() {}")?;

  let first = run_apkship(&project.path, &["publish", "--build"])?;
  assert!(first.status.success(), "stderr: {}", stderr(&first));
  assert!(stdout(&first).contains("building"));
  assert!(project.file_exists("out/app.apk"));

  let second = run_apkship(&project.path, &["publish", "--build"])?;
  assert!(second.status.success());
  assert!(stdout(&second).contains("skipping build"));
  assert!(!stdout(&second).contains("building"));

  let forced = run_apkship(&project.path, &["publish", "--build", "--force-build"])?;
  assert!(forced.status.success());
  assert!(stdout(&forced).contains("building"));
  Ok(())
}

#[test]
fn test_failed_build() -> Result<()> {
  let project = TestProject::new("1.4.2+23")?;
  project.config(
    r#"
[build]
command = ["sh", "-c", "exit 3"]
cleanup_processes = []
"#,
  )?;

  let output = run_apkship(&project.path, &["publish", "--build"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("exited with code 3"));
  Ok(())
}

#[test]
fn test_full_pipeline_requires_token_before_building() -> Result<()> {
  let project = TestProject::new("1.4.2+23")?;
  project.config(&config_with_analyzer(""))?;

  let output = run_apkship(&project.path, &["publish"])?;
  let err = stderr(&output);

  assert_eq!(output.status.code(), Some(1));
  assert!(err.contains("GITHUB_TOKEN is not configured"), "stderr: {}", err);
  assert!(err.contains("Help:"));
  assert!(!project.file_exists("out/app.apk"));
  Ok(())
}

#[test]
fn test_missing_manifest() -> Result<()> {
  let project = TestProject::new("1.0.0+1")?;
  std::fs::remove_file(project.path.join("pubspec.yaml"))?;

  let output = run_apkship(&project.path, &["publish", "--check"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("No manifest found"));
  Ok(())
}

#[test]
fn test_directory_flag() -> Result<()> {
  let project = TestProject::new("2.0.0+7")?;
  project.config(&config_with_analyzer(""))?;
  let elsewhere = tempfile::TempDir::new()?;
  let dir = project.path.to_string_lossy().into_owned();

  let output = run_apkship(elsewhere.path(), &["-C", &dir, "publish", "--check"])?;

  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(stdout(&output).contains("2.0.0 (Build: 7)"));
  Ok(())
}

#[test]
fn test_check_and_build_conflict() -> Result<()> {
  let project = TestProject::new("1.0.0+1")?;
  let output = run_apkship(&project.path, &["publish", "--check", "--build"])?;
  assert!(!output.status.success());
  Ok(())
}

#[test]
fn test_step_flags_reject_unrelated_options() -> Result<()> {
  let project = TestProject::new("1.0.0+1")?;
  project.config(&config_with_analyzer(""))?;

  for args in [
    ["publish", "--check", "--skip-check"],
    ["publish", "--check", "--force-build"],
    ["publish", "--build", "--skip-check"],
  ] {
    let output = run_apkship(&project.path, &args)?;
    assert_eq!(output.status.code(), Some(2), "{:?} should be a usage error", args);
    assert!(stderr(&output).contains("cannot be used with"), "{:?}: {}", args, stderr(&output));
    assert!(!project.file_exists("out/app.apk"));
  }
  Ok(())
}
