//! Cached OAuth credentials (`sheets_token.json`)

use crate::core::error::{ResultExt, ShipResult};
use crate::oauth::secrets::ClientSecrets;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tokens are treated as expired this long before the provider says so
const EXPIRY_SKEW_SECS: i64 = 60;

/// Everything needed to use and refresh an access token without the secrets file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
  pub access_token: String,
  #[serde(default)]
  pub refresh_token: Option<String>,
  #[serde(default)]
  pub expires_at: Option<DateTime<Utc>>,
  pub token_uri: String,
  pub client_id: String,
  #[serde(default)]
  pub client_secret: Option<String>,
  #[serde(default)]
  pub scopes: Vec<String>,
}

/// Token endpoint response body
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
  pub access_token: String,
  #[serde(default)]
  pub expires_in: Option<i64>,
  #[serde(default)]
  pub refresh_token: Option<String>,
  #[serde(default)]
  pub scope: Option<String>,
}

impl StoredCredentials {
  /// Credentials from a fresh authorization-code exchange
  pub fn from_response(
    client: &ClientSecrets,
    scopes: &[String],
    response: TokenResponse,
    now: DateTime<Utc>,
  ) -> Self {
    let mut creds = Self {
      access_token: String::new(),
      refresh_token: None,
      expires_at: None,
      token_uri: client.token_uri.clone(),
      client_id: client.client_id.clone(),
      client_secret: client.client_secret.clone(),
      scopes: scopes.to_vec(),
    };
    creds.apply(response, now);
    creds
  }

  /// Fold a token response in; a response without a refresh token keeps the old one
  pub fn apply(&mut self, response: TokenResponse, now: DateTime<Utc>) {
    self.access_token = response.access_token;
    self.expires_at = response.expires_in.map(|secs| now + Duration::seconds(secs));
    if let Some(refresh) = response.refresh_token {
      self.refresh_token = Some(refresh);
    }
    if let Some(scope) = response.scope {
      self.scopes = scope.split_whitespace().map(str::to_string).collect();
    }
  }

  /// Usable right now (no expiry recorded counts as usable)
  pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
    if self.access_token.is_empty() {
      return false;
    }
    match self.expires_at {
      Some(expires_at) => expires_at > now + Duration::seconds(EXPIRY_SKEW_SECS),
      None => true,
    }
  }

  pub fn can_refresh(&self) -> bool {
    self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
  }

  /// Read the cache; a missing or unreadable cache is `None`
  pub fn load(path: &Path) -> Option<Self> {
    let json = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&json) {
      Ok(creds) => Some(creds),
      Err(e) => {
        log::warn!("ignoring unreadable token cache {}: {}", path.display(), e);
        println!("⚠️  Token cache {} is unreadable, ignoring it", path.display());
        None
      }
    }
  }

  pub fn save(&self, path: &Path) -> ShipResult<()> {
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(self)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
  }
}
