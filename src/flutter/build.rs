//! Release build step
//!
//! Runs the configured build command with inherited stdio, then kills the
//! Gradle/Java daemons it leaves behind so they stop holding memory. Cleanup
//! runs whether or not the build succeeded.

use crate::core::context::ProjectContext;
use crate::core::error::{ShipResult, ToolError};
use crate::core::process::{display_command, kill_matching_processes, spawn_error, tool_command};
use crate::flutter::freshness::should_skip_build;

/// What the build step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
  /// Artifact was already newer than every source
  UpToDate,
  /// Build tool ran and produced the artifact
  Built,
}

/// Build the artifact unless it is already up to date (or `force` is set)
pub fn build_artifact(ctx: &ProjectContext, force: bool) -> ShipResult<BuildStatus> {
  let build = &ctx.config.build;
  let artifact = ctx.artifact_path();

  if !force {
    let sources: Vec<_> = build.sources.iter().map(|p| ctx.resolve(p)).collect();
    if should_skip_build(&artifact, &sources, &build.source_extensions) {
      println!("ℹ️  Artifact is newer than all sources, skipping build");
      println!("   {}", artifact.display());
      return Ok(BuildStatus::UpToDate);
    }
  }

  println!("🔨 Building: {}", display_command(&build.command));
  let result = run_build(ctx);
  cleanup_build_processes(&build.cleanup_processes);
  result?;

  if !artifact.is_file() {
    return Err(ToolError::ArtifactMissing { path: artifact }.into());
  }

  println!("✅ Build succeeded");
  Ok(BuildStatus::Built)
}

fn run_build(ctx: &ProjectContext) -> ShipResult<()> {
  let argv = &ctx.config.build.command;
  let status = tool_command(argv, &ctx.root)?
    .status()
    .map_err(|e| spawn_error(argv, e))?;

  if !status.success() {
    return Err(
      ToolError::BuildFailed {
        command: display_command(argv),
        code: status.code(),
      }
      .into(),
    );
  }
  Ok(())
}

fn cleanup_build_processes(patterns: &[String]) {
  if patterns.is_empty() {
    return;
  }

  println!("🧹 Cleaning up build processes ({})...", patterns.join(", "));
  let report = kill_matching_processes(patterns);
  if report.killed.is_empty() && report.failed.is_empty() {
    println!("   Nothing to clean up");
    return;
  }
  if !report.killed.is_empty() {
    println!("   Stopped {} process(es)", report.killed.len());
  }
  if !report.failed.is_empty() {
    println!("⚠️  Could not stop: {}", report.failed.join(", "));
  }
}
