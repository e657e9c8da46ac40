//! OAuth Token Fetcher
//!
//! Produces a Google access token for the Sheets integration: cached token if
//! still valid, else a refresh, else the interactive browser flow. The result
//! is cached and printed between `---START_CREDENTIALS---` markers so other
//! tooling can scrape it.

use crate::core::context::ProjectContext;
use crate::core::error::ShipResult;
use crate::oauth::flow::{authorize_interactive, refresh};
use crate::oauth::{ClientSecrets, StoredCredentials};
use chrono::Utc;
use log::warn;
use reqwest::blocking::Client;
use std::path::Path;

/// Run the sheets-token command
pub fn run_sheets_token(ctx: &ProjectContext, open_browser: bool) -> ShipResult<()> {
  let oauth = &ctx.config.oauth;
  let cache_path = ctx.resolve(&oauth.token_cache);
  let secrets_path = ctx.resolve(&oauth.client_secrets);

  let http = Client::builder()
    .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
    .build()?;

  let cached = StoredCredentials::load(&cache_path);
  let creds = obtain_credentials(&http, cached, &secrets_path, &oauth.scopes, open_browser)?;

  creds.save(&cache_path)?;
  println!("✅ Token saved to {}", cache_path.display());
  println!();

  let secrets = ClientSecrets::try_load(&secrets_path);
  print!("{}", credentials_block(&creds, secrets.as_ref()));
  Ok(())
}

/// Cached, refreshed or freshly authorized credentials, in that order of preference
fn obtain_credentials(
  http: &Client,
  cached: Option<StoredCredentials>,
  secrets_path: &Path,
  scopes: &[String],
  open_browser: bool,
) -> ShipResult<StoredCredentials> {
  if let Some(mut creds) = cached {
    if creds.is_valid(Utc::now()) {
      println!("ℹ️  Cached token is still valid");
      return Ok(creds);
    }

    if creds.can_refresh() {
      println!("🔄 Refreshing access token...");
      match refresh(http, &mut creds) {
        Ok(()) => return Ok(creds),
        Err(e) => {
          warn!("token refresh failed: {}", e);
          println!("⚠️  Refresh failed ({}), starting a new authorization", e);
        }
      }
    }
  }

  let client = ClientSecrets::load(secrets_path)?;
  println!("🔐 Starting browser authorization");
  authorize_interactive(http, &client, scopes, open_browser)
}

/// The block scraped by downstream tooling
pub fn credentials_block(creds: &StoredCredentials, secrets: Option<&ClientSecrets>) -> String {
  let mut out = String::from("---START_CREDENTIALS---\n");
  out.push_str(&format!("ACCESS TOKEN: {}\n", creds.access_token));
  if let Some(refresh_token) = creds.refresh_token.as_deref() {
    out.push_str(&format!("REFRESH TOKEN: {}\n", refresh_token));
  }
  if let Some(secrets) = secrets {
    out.push_str(&format!("CLIENT ID: {}\n", secrets.client_id));
    if let Some(secret) = secrets.client_secret.as_deref() {
      out.push_str(&format!("CLIENT SECRET: {}\n", secret));
    }
  }
  out.push_str("---END_CREDENTIALS---\n");
  out
}
