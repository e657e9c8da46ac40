//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A throwaway Flutter-shaped project
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Project with a pubspec.yaml declaring `version`
  pub fn new(version: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    std::fs::write(
      path.join("pubspec.yaml"),
      format!("name: overtime\ndescription: Test app\nversion: {}\n", version),
    )?;

    Ok(Self { _root: root, path })
  }

  /// Write ship.toml
  pub fn config(&self, toml: &str) -> Result<()> {
    std::fs::write(self.path.join("ship.toml"), toml)?;
    Ok(())
  }

  /// Write a file relative to the project root, creating parent dirs
  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let file_path = self.path.join(path);
    if let Some(parent) = file_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
  }

  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }
}

/// Run apkship in `cwd`; the caller checks the exit status
///
/// GITHUB_TOKEN is cleared so the host environment never leaks a real token
/// into a test.
pub fn run_apkship(cwd: &Path, args: &[&str]) -> Result<Output> {
  let apkship_bin = env!("CARGO_BIN_EXE_apkship");

  Command::new(apkship_bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("GITHUB_TOKEN")
    .env_remove("APKSHIP_LOG")
    .output()
    .context("Failed to run apkship")
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}
