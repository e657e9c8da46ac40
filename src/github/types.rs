//! GitHub REST payloads (only the fields we read or send)

use serde::{Deserialize, Serialize};

/// Release as returned by the releases API
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Release {
  pub id: u64,
  pub tag_name: String,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub html_url: Option<String>,
  #[serde(default)]
  pub assets: Vec<ReleaseAsset>,
}

/// Binary attached to a release
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ReleaseAsset {
  pub id: u64,
  pub name: String,
  pub browser_download_url: String,
  #[serde(default)]
  pub size: u64,
}

/// Body for creating or editing a release
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewRelease {
  pub tag_name: String,
  pub name: String,
  pub body: String,
  pub draft: bool,
  pub prerelease: bool,
}

/// `GET /contents/{path}` response (file case)
#[derive(Debug, Clone, Deserialize)]
pub struct ContentFile {
  pub sha: String,
}

/// Body for `PUT /contents/{path}`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PutFile {
  pub message: String,
  /// Base64 of the file bytes
  pub content: String,
  pub branch: String,
  /// Required when the file already exists
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sha: Option<String>,
}
