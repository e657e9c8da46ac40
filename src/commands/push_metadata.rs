//! Metadata Force-Pusher
//!
//! Re-sends the local `metadata.json` to every metadata repo as-is. Useful
//! when the publish step uploaded the release but the metadata push failed,
//! or when the remote copy was edited by hand.

use crate::core::context::ProjectContext;
use crate::core::error::{ConfigError, ResultExt, ShipError, ShipResult};
use crate::github::{ContentsApi, GitHubClient};
use crate::release::push_file;
use std::fs;
use std::path::PathBuf;

const FALLBACK_MESSAGE: &str = "Resend metadata";

/// Run the push-metadata command
pub fn run_push_metadata(ctx: &ProjectContext, file: Option<PathBuf>, message: Option<String>) -> ShipResult<()> {
  let path = file.map(|p| ctx.resolve(&p)).unwrap_or_else(|| ctx.metadata_path());
  if !path.is_file() {
    return Err(ShipError::Config(ConfigError::NotFound {
      what: "metadata file".to_string(),
      path,
    }));
  }
  let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;

  let repos = ctx.config.github.require_metadata_repos()?;
  let token = ctx.require_github_token()?;
  let client = GitHubClient::new(&ctx.config.github, token)?;

  let message = message.unwrap_or_else(|| resend_message(&content));
  println!("📤 Pushing {} to {} repo(s)", path.display(), repos.len());
  println!("   Commit message: {}", message);

  force_push(&client, ctx, &content, &message)
}

/// Commit message derived from the file when it happens to be a metadata record
pub fn resend_message(content: &str) -> String {
  let Ok(value) = serde_json::from_str::<serde_json::Value>(content) else {
    return FALLBACK_MESSAGE.to_string();
  };

  let name = value.get("versionName").and_then(|v| v.as_str());
  let code = value.get("versionCode").and_then(|v| v.as_u64());
  match (name, code) {
    (Some(name), Some(code)) => format!("{} v{} (Build {})", FALLBACK_MESSAGE, name, code),
    _ => FALLBACK_MESSAGE.to_string(),
  }
}

/// Overwrite the remote copy in every metadata repo; any failure fails the command
fn force_push<C: ContentsApi + ?Sized>(api: &C, ctx: &ProjectContext, content: &str, message: &str) -> ShipResult<()> {
  let github = &ctx.config.github;
  let outcomes = push_file(api, &github.metadata_repos, &github.metadata_path, &github.branch, content, message);

  for outcome in &outcomes {
    match &outcome.result {
      Ok(status) => println!("✅ {} (HTTP {})", outcome.repo, status),
      Err(e) => println!("❌ {}: {}", outcome.repo, e),
    }
  }

  let failed = outcomes.iter().filter(|o| !o.succeeded()).count();

  if failed > 0 {
    return Err(ShipError::message(format!(
      "{} of {} metadata push(es) failed",
      failed,
      outcomes.len()
    )));
  }
  Ok(())
}
