//! Project context - built once in main, passed to every command
//!
//! Holds the project root and the loaded `ShipConfig`. All project-relative
//! paths in the config are resolved against `root` through the helpers here,
//! so commands never depend on the process working directory.

use crate::core::config::ShipConfig;
use crate::core::error::{ConfigError, ShipError, ShipResult};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable checked before the token file
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone)]
pub struct ProjectContext {
  /// Project root (where pubspec.yaml lives)
  pub root: PathBuf,

  pub config: ShipConfig,
}

impl ProjectContext {
  /// Build the context from a project root, loading ship.toml if present
  pub fn build(root: &Path) -> ShipResult<Self> {
    let config = ShipConfig::load(root)?;
    Ok(Self {
      root: root.to_path_buf(),
      config,
    })
  }

  /// Resolve a project-relative path
  pub fn resolve(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.root.join(path)
    }
  }

  pub fn manifest_path(&self) -> PathBuf {
    self.resolve(&self.config.paths.manifest)
  }

  pub fn artifact_path(&self) -> PathBuf {
    self.resolve(&self.config.paths.artifact)
  }

  pub fn metadata_path(&self) -> PathBuf {
    self.resolve(&self.config.paths.metadata)
  }

  pub fn release_notes_dir(&self) -> PathBuf {
    self.resolve(&self.config.paths.release_notes_dir)
  }

  /// GitHub token from the environment, then the token file
  ///
  /// Returns `None` when neither holds a non-blank value.
  pub fn github_token(&self) -> Option<String> {
    if let Ok(token) = env::var(TOKEN_ENV) {
      let token = token.trim();
      if !token.is_empty() {
        return Some(token.to_string());
      }
    }

    let token_file = self.resolve(&self.config.github.token_file);
    match fs::read_to_string(&token_file) {
      Ok(content) => {
        let token = content.trim();
        (!token.is_empty()).then(|| token.to_string())
      }
      Err(_) => None,
    }
  }

  /// GitHub token or a config error with setup instructions
  pub fn require_github_token(&self) -> ShipResult<String> {
    self.github_token().ok_or_else(|| {
      ShipError::Config(ConfigError::MissingToken {
        token_file: self.config.github.token_file.clone(),
      })
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_resolve_relative_and_absolute() {
    let dir = TempDir::new().unwrap();
    let ctx = ProjectContext::build(dir.path()).unwrap();

    assert_eq!(ctx.manifest_path(), dir.path().join("pubspec.yaml"));

    let abs = dir.path().join("elsewhere.json");
    assert_eq!(ctx.resolve(&abs), abs);
  }

  #[test]
  fn test_token_file_is_trimmed() {
    let dir = TempDir::new().unwrap();
    let ctx = ProjectContext::build(dir.path()).unwrap();
    let token_file = ctx.resolve(&ctx.config.github.token_file);
    fs::create_dir_all(token_file.parent().unwrap()).unwrap();
    fs::write(&token_file, "  ghp_secret\n").unwrap();

    // The env var takes precedence when set; only assert the file path when it isn't
    if env::var(TOKEN_ENV).is_err() {
      assert_eq!(ctx.github_token().as_deref(), Some("ghp_secret"));
    }
  }

  #[test]
  fn test_blank_token_file_is_missing() {
    let dir = TempDir::new().unwrap();
    let ctx = ProjectContext::build(dir.path()).unwrap();
    let token_file = ctx.resolve(&ctx.config.github.token_file);
    fs::create_dir_all(token_file.parent().unwrap()).unwrap();
    fs::write(&token_file, "\n").unwrap();

    if env::var(TOKEN_ENV).is_err() {
      assert!(ctx.github_token().is_none());
      assert!(ctx.require_github_token().is_err());
    }
  }
}
