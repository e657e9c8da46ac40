//! pubspec.yaml version reading
//!
//! Flutter declares `version: <name>+<build>`. The name is what users see and
//! what the release tag is derived from; the build number is the Android
//! `versionCode` the app compares against when it polls for updates.

use crate::core::error::{ConfigError, ShipError, ShipResult};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Used when the manifest has no `version` key
const DEFAULT_VERSION: &str = "1.0.0+1";

/// Parsed `name+code` pair from the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppVersion {
  pub name: String,
  pub code: u64,
}

#[derive(Deserialize)]
struct Pubspec {
  #[serde(default)]
  version: Option<serde_yaml::Value>,
}

impl AppVersion {
  /// Parse `1.4.2+23`; a value without `+` gets build code 1
  pub fn parse(raw: &str) -> Result<Self, String> {
    let raw = raw.trim();
    let (name, code) = match raw.split_once('+') {
      Some((name, build)) => {
        let code = build
          .trim()
          .parse::<u64>()
          .map_err(|_| format!("build number '{}' is not a non-negative integer", build))?;
        (name.trim(), code)
      }
      None => (raw, 1),
    };

    if name.is_empty() {
      return Err("version name is empty".to_string());
    }

    Ok(Self {
      name: name.to_string(),
      code,
    })
  }

  /// Read the version from a pubspec.yaml file
  pub fn from_manifest(path: &Path) -> ShipResult<Self> {
    if !path.exists() {
      return Err(ShipError::Config(ConfigError::NotFound {
        what: "manifest".to_string(),
        path: path.to_path_buf(),
      }));
    }

    let content = fs::read_to_string(path)?;
    let pubspec: Pubspec = serde_yaml::from_str(&content).map_err(|e| invalid_manifest(path, e.to_string()))?;

    // YAML reads `version: 2` as a number, so accept any scalar
    let raw = match pubspec.version {
      None | Some(serde_yaml::Value::Null) => DEFAULT_VERSION.to_string(),
      Some(serde_yaml::Value::String(s)) => s,
      Some(serde_yaml::Value::Number(n)) => n.to_string(),
      Some(other) => {
        return Err(invalid_manifest(path, format!("`version` must be a scalar, found {:?}", other)));
      }
    };

    Self::parse(&raw).map_err(|reason| invalid_manifest(path, reason))
  }

  /// Release tag on the hosting platform
  pub fn tag(&self) -> String {
    format!("v{}", self.name)
  }
}

impl fmt::Display for AppVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} (Build: {})", self.name, self.code)
  }
}

fn invalid_manifest(path: &Path, reason: String) -> ShipError {
  ShipError::Config(ConfigError::InvalidManifest {
    path: path.to_path_buf(),
    reason,
  })
}
