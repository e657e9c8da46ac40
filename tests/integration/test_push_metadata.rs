//! Integration tests for `apkship push-metadata`
//!
//! Only the offline failure branches are covered here; the create and
//! overwrite behavior is unit-tested against the in-memory host.

use crate::helpers::{TestProject, run_apkship, stderr};
use anyhow::Result;

const METADATA_REPOS: &str = r#"
[github]
metadata_repos = ["acme/overtime-updates"]
"#;

#[test]
fn test_missing_metadata_file() -> Result<()> {
  let project = TestProject::new("1.4.2+23")?;
  project.config(METADATA_REPOS)?;

  let output = run_apkship(&project.path, &["push-metadata"])?;
  let err = stderr(&output);

  assert_eq!(output.status.code(), Some(1));
  assert!(err.contains("No metadata file found"), "stderr: {}", err);
  assert!(err.contains("apkship publish"));
  Ok(())
}

#[test]
fn test_missing_token() -> Result<()> {
  let project = TestProject::new("1.4.2+23")?;
  project.config(METADATA_REPOS)?;
  project.write_file("metadata.json", r#"{"versionName":"1.4.2","versionCode":23}"#)?;

  let output = run_apkship(&project.path, &["push-metadata"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("GITHUB_TOKEN is not configured"));
  Ok(())
}

#[test]
fn test_missing_metadata_repos() -> Result<()> {
  let project = TestProject::new("1.4.2+23")?;
  project.write_file("custom/meta.json", "{}")?;

  let output = run_apkship(&project.path, &["push-metadata", "--file", "custom/meta.json"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("github.metadata_repos"));
  Ok(())
}

#[test]
fn test_invalid_repo_name_rejected() -> Result<()> {
  let project = TestProject::new("1.4.2+23")?;
  project.config(
    r#"
[github]
metadata_repos = ["not-a-repo"]
"#,
  )?;

  let output = run_apkship(&project.path, &["push-metadata"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("owner/name"));
  Ok(())
}
