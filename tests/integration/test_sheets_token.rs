//! Integration tests for `apkship sheets-token`

use crate::helpers::{TestProject, run_apkship, stderr, stdout};
use anyhow::Result;

#[test]
fn test_missing_client_secrets() -> Result<()> {
  let project = TestProject::new("1.0.0+1")?;

  let output = run_apkship(&project.path, &["sheets-token", "--no-browser"])?;
  let err = stderr(&output);

  assert_eq!(output.status.code(), Some(1));
  assert!(err.contains("No client secrets found"), "stderr: {}", err);
  assert!(err.contains("Google Cloud Console"));
  assert!(!stdout(&output).contains("---START_CREDENTIALS---"));
  assert!(!project.file_exists("tool/sheets_token.json"));
  Ok(())
}

#[test]
fn test_valid_cached_token_is_printed() -> Result<()> {
  let project = TestProject::new("1.0.0+1")?;
  project.write_file(
    "tool/sheets_token.json",
    r#"{
  "access_token": "ya29.cached",
  "refresh_token": "1//refresh",
  "expires_at": null,
  "token_uri": "https://oauth2.googleapis.com/token",
  "client_id": "cid.apps.googleusercontent.com",
  "client_secret": "shh",
  "scopes": ["https://www.googleapis.com/auth/spreadsheets"]
}"#,
  )?;
  project.write_file(
    "tool/credentials.json",
    r#"{"installed":{"client_id":"cid.apps.googleusercontent.com","client_secret":"shh"}}"#,
  )?;

  let output = run_apkship(&project.path, &["sheets-token", "--no-browser"])?;
  let out = stdout(&output);

  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(out.contains("---START_CREDENTIALS---\nACCESS TOKEN: ya29.cached\nREFRESH TOKEN: 1//refresh\n"));
  assert!(out.contains("CLIENT ID: cid.apps.googleusercontent.com\nCLIENT SECRET: shh\n---END_CREDENTIALS---"));
  Ok(())
}

#[test]
fn test_corrupt_cache_is_ignored() -> Result<()> {
  let project = TestProject::new("1.0.0+1")?;
  project.write_file("tool/sheets_token.json", "garbage")?;

  let output = run_apkship(&project.path, &["sheets-token", "--no-browser"])?;

  // Falls through to the interactive flow, which needs the secrets file
  assert_eq!(output.status.code(), Some(1));
  assert!(stdout(&output).contains("unreadable"));
  assert!(stderr(&output).contains("No client secrets found"));
  Ok(())
}
