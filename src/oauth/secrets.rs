//! Google OAuth client secrets file (`credentials.json`)

use crate::core::error::{ConfigError, OAuthError, ResultExt, ShipError, ShipResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// One OAuth client as downloaded from Google Cloud Console
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientSecrets {
  pub client_id: String,
  #[serde(default)]
  pub client_secret: Option<String>,
  #[serde(default = "default_auth_uri")]
  pub auth_uri: String,
  #[serde(default = "default_token_uri")]
  pub token_uri: String,
}

fn default_auth_uri() -> String {
  DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
  DEFAULT_TOKEN_URI.to_string()
}

#[derive(Deserialize)]
struct SecretsFile {
  #[serde(default)]
  installed: Option<ClientSecrets>,
  #[serde(default)]
  web: Option<ClientSecrets>,
}

impl ClientSecrets {
  /// Parse the file body; desktop (`installed`) clients win over `web`
  pub fn parse(json: &str) -> ShipResult<Self> {
    let file: SecretsFile = serde_json::from_str(json).map_err(|e| OAuthError::MalformedSecrets {
      reason: e.to_string(),
    })?;

    file.installed.or(file.web).ok_or_else(|| {
      OAuthError::MalformedSecrets {
        reason: "expected an `installed` or `web` section".to_string(),
      }
      .into()
    })
  }

  /// Load the secrets file; absence is a config error
  pub fn load(path: &Path) -> ShipResult<Self> {
    if !path.is_file() {
      return Err(ShipError::Config(ConfigError::NotFound {
        what: "client secrets".to_string(),
        path: path.to_path_buf(),
      }));
    }
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Self::parse(&json)
  }

  /// Best-effort read for printing identifiers; any problem yields `None`
  pub fn try_load(path: &Path) -> Option<Self> {
    let json = fs::read_to_string(path).ok()?;
    Self::parse(&json).ok()
  }
}
