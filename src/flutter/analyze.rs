//! `flutter analyze` gate
//!
//! The analyzer exits non-zero for infos and warnings too, so its exit status
//! is useless as a gate. Instead the report lines are counted by severity:
//!
//! ```text
//!   error - Undefined name 'foo' - lib/main.dart:10:3 - undefined_identifier
//! warning - Unused import - lib/a.dart:1:8 - unused_import
//!    info - Prefer const - lib/b.dart:4:5 - prefer_const_constructors
//! ```

use crate::core::context::ProjectContext;
use crate::core::error::ShipResult;
use crate::core::process::{display_command, spawn_error, tool_command};
use regex::Regex;
use std::sync::LazyLock;

static ERROR_LINE: LazyLock<Regex> = LazyLock::new(|| severity_pattern("error"));
static WARNING_LINE: LazyLock<Regex> = LazyLock::new(|| severity_pattern("warning"));
static INFO_LINE: LazyLock<Regex> = LazyLock::new(|| severity_pattern("info"));

fn severity_pattern(severity: &str) -> Regex {
  Regex::new(&format!(r"(?mi)^\s*{}\s+-", severity)).expect("static severity pattern")
}

/// Severity counts from one analyzer run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LintReport {
  pub errors: usize,
  pub warnings: usize,
  pub infos: usize,
}

/// Gate decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintOutcome {
  /// Nothing reported
  Clean,
  /// Warnings only; does not block the build
  Warnings,
  /// At least one error
  Failed,
}

impl LintOutcome {
  pub fn passed(self) -> bool {
    !matches!(self, LintOutcome::Failed)
  }
}

impl LintReport {
  /// Count severity lines in analyzer stdout
  pub fn parse(stdout: &str) -> Self {
    Self {
      errors: ERROR_LINE.find_iter(stdout).count(),
      warnings: WARNING_LINE.find_iter(stdout).count(),
      infos: INFO_LINE.find_iter(stdout).count(),
    }
  }

  pub fn outcome(&self) -> LintOutcome {
    if self.errors > 0 {
      LintOutcome::Failed
    } else if self.warnings > 0 {
      LintOutcome::Warnings
    } else {
      LintOutcome::Clean
    }
  }
}

/// Run the configured analyzer, echo its output and count severities
pub fn run_analyzer(ctx: &ProjectContext) -> ShipResult<LintReport> {
  let argv = &ctx.config.analyze.command;

  println!("🔍 Running {}...", display_command(argv));
  let output = tool_command(argv, &ctx.root)?
    .output()
    .map_err(|e| spawn_error(argv, e))?;

  let stdout = String::from_utf8_lossy(&output.stdout);
  let stderr = String::from_utf8_lossy(&output.stderr);
  if !stdout.trim().is_empty() {
    println!("{}", stdout.trim_end());
  }
  if !stderr.trim().is_empty() {
    eprintln!("{}", stderr.trim_end());
  }
  log::debug!("analyzer exit status: {:?}", output.status.code());

  let report = LintReport::parse(&stdout);
  println!();
  println!(
    "Result: {} errors, {} warnings, {} infos",
    report.errors, report.warnings, report.infos
  );
  match report.outcome() {
    LintOutcome::Failed => println!("❌ Errors must be fixed before building"),
    LintOutcome::Warnings => println!("⚠️  Warnings found, not blocking the build"),
    LintOutcome::Clean => println!("✅ No issues found"),
  }

  Ok(report)
}
