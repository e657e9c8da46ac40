//! Update metadata record (metadata.json)
//!
//! The running app polls this file and compares `versionCode` with its own
//! build number. The JSON shape is fixed; field names are camelCase on the
//! wire.

use crate::core::error::{ResultExt, ShipResult};
use crate::flutter::AppVersion;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Latest publishable version, as polled by the app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMetadata {
  pub version_name: String,
  pub version_code: u64,
  pub download_url: String,
  /// Full markdown release notes, not escaped
  pub changelog: String,
  pub published_at: DateTime<Utc>,
  /// e.g. `21.3MB`
  pub file_size: String,
}

impl UpdateMetadata {
  /// Build a fresh record stamped with the current time
  pub fn new(
    version: &AppVersion,
    download_url: impl Into<String>,
    artifact_bytes: u64,
    changelog: impl Into<String>,
  ) -> Self {
    Self::at(version, download_url, artifact_bytes, changelog, Utc::now())
  }

  /// Build a record with an explicit publish time
  pub fn at(
    version: &AppVersion,
    download_url: impl Into<String>,
    artifact_bytes: u64,
    changelog: impl Into<String>,
    published_at: DateTime<Utc>,
  ) -> Self {
    Self {
      version_name: version.name.clone(),
      version_code: version.code,
      download_url: download_url.into(),
      changelog: changelog.into(),
      // Microseconds survive the RFC 3339 round trip exactly
      published_at: published_at.trunc_subsecs(6),
      file_size: format_mib(artifact_bytes),
    }
  }

  /// Pretty JSON, 2-space indent, non-ASCII left as UTF-8
  pub fn to_json(&self) -> ShipResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  #[cfg(test)]
  pub fn from_json(json: &str) -> ShipResult<Self> {
    Ok(serde_json::from_str(json)?)
  }

  /// Write the record to disk, returning the exact text written
  pub fn save(&self, path: &Path) -> ShipResult<String> {
    let json = self.to_json()?;
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, &json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(json)
  }

  /// Commit message used when publishing this record
  pub fn commit_message(&self) -> String {
    format!("Update metadata v{} (Build {})", self.version_name, self.version_code)
  }
}

/// `{size in MiB:.1}MB`
pub fn format_mib(bytes: u64) -> String {
  format!("{:.1}MB", bytes as f64 / BYTES_PER_MIB)
}
