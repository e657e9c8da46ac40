//! Release Publisher
//!
//! `apkship publish` runs the analyzer gate, builds the artifact, uploads it
//! to the version's GitHub release and publishes `metadata.json`. `--check`
//! and `--build` run a single step on their own.

use crate::core::context::ProjectContext;
use crate::core::error::{ResultExt, ShipResult, ToolError};
use crate::flutter::{AppVersion, BuildStatus, LintReport, build_artifact, run_analyzer};
use crate::github::{ContentsApi, GitHubClient, ReleaseApi};
use crate::release::{ArtifactUpload, UpdateMetadata, load_release_notes, publish_artifact, push_file};
use crate::ui::format_size;
use log::{info, warn};
use sha2::{Digest, Sha256};
use std::fs;

/// Which part of the pipeline to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMode {
  /// Analyzer gate only
  Check,
  /// Build step only
  Build,
  /// Analyze, build, release, metadata
  Full,
}

#[derive(Debug, Clone, Copy)]
pub struct PublishOptions {
  pub mode: PublishMode,
  pub skip_check: bool,
  pub force_build: bool,
}

/// Run the publish command
pub fn run_publish(ctx: &ProjectContext, options: PublishOptions) -> ShipResult<()> {
  let version = AppVersion::from_manifest(&ctx.manifest_path())?;
  println!("📦 {} {}", ctx.config.app.name, version);
  println!();

  match options.mode {
    PublishMode::Check => run_check(ctx).map(|_| ()),
    PublishMode::Build => build_artifact(ctx, options.force_build).map(|_| ()),
    PublishMode::Full => {
      let repo = ctx.config.github.require_repo()?;
      let token = ctx.require_github_token()?;
      let client = GitHubClient::new(&ctx.config.github, token)?;
      publish_release(ctx, &client, repo, &version, options)
    }
  }
}

/// Analyzer gate; error-severity findings fail the step
fn run_check(ctx: &ProjectContext) -> ShipResult<LintReport> {
  let report = run_analyzer(ctx)?;
  if !report.outcome().passed() {
    return Err(
      ToolError::LintFailed {
        errors: report.errors,
        warnings: report.warnings,
      }
      .into(),
    );
  }
  Ok(report)
}

/// Full pipeline against an already authenticated host
fn publish_release<A: ReleaseApi + ContentsApi + ?Sized>(
  ctx: &ProjectContext,
  api: &A,
  repo: &str,
  version: &AppVersion,
  options: PublishOptions,
) -> ShipResult<()> {
  if options.skip_check {
    println!("⚠️  Skipping analyzer (--skip-check)");
  } else {
    run_check(ctx)?;
  }
  println!();

  if build_artifact(ctx, options.force_build)? == BuildStatus::UpToDate {
    info!("reusing existing artifact");
  }

  let artifact = ctx.artifact_path();
  let bytes = fs::read(&artifact).with_context(|| format!("Failed to read {}", artifact.display()))?;
  let size = bytes.len() as u64;
  let checksum = sha256_hex(&bytes);
  let extension = artifact
    .extension()
    .and_then(|e| e.to_str())
    .unwrap_or("apk")
    .to_lowercase();

  let notes = load_release_notes(&ctx.release_notes_dir(), &ctx.config.app.name, version)?;

  println!();
  println!("🚀 Publishing {} to {} ({})", version.tag(), repo, format_size(size));
  let published = publish_artifact(
    api,
    ArtifactUpload {
      repo,
      app_name: &ctx.config.app.name,
      asset_prefix: &ctx.config.app.asset_prefix,
      version,
      notes: &notes,
      extension: &extension,
      bytes,
    },
  )?;
  println!("✅ Uploaded {}", published.download_url);

  let metadata = UpdateMetadata::new(version, &published.download_url, size, notes);
  let metadata_path = ctx.metadata_path();
  let json = metadata.save(&metadata_path)?;
  println!("✅ Saved {}", metadata_path.display());

  publish_metadata(ctx, api, &json, &metadata.commit_message());

  println!();
  println!("🎉 Release complete");
  println!("   Version:  {}", version);
  println!("   Download: {}", published.download_url);
  println!("   SHA-256:  {}", checksum);
  Ok(())
}

/// Push the record to every metadata repo; failures are only warnings
fn publish_metadata<C: ContentsApi + ?Sized>(ctx: &ProjectContext, api: &C, json: &str, message: &str) {
  let github = &ctx.config.github;
  if github.metadata_repos.is_empty() {
    println!("⚠️  No github.metadata_repos configured, metadata not published");
    return;
  }

  for outcome in push_file(api, &github.metadata_repos, &github.metadata_path, &github.branch, json, message) {
    match &outcome.result {
      Ok(status) => println!("✅ Metadata pushed to {} (HTTP {})", outcome.repo, status),
      Err(e) => {
        warn!("metadata push to {} failed: {}", outcome.repo, e);
        println!("⚠️  Metadata push to {} failed: {}", outcome.repo, e);
      }
    }
  }
}

fn sha256_hex(bytes: &[u8]) -> String {
  format!("{:x}", Sha256::digest(bytes))
}
