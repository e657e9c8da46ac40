//! Launching external tools and cleaning up after them
//!
//! Tool commands come from ship.toml as argv vectors. On Windows the Flutter
//! launcher is a batch file, which `Command::new("flutter")` can't start, so
//! every tool goes through `cmd /C` there.

use crate::core::error::{ShipResult, ToolError};
use log::{debug, warn};
use std::path::Path;
use std::process::Command;
use sysinfo::{ProcessesToUpdate, System};

/// Build a `Command` for an argv vector, rooted at `cwd`
pub fn tool_command(argv: &[String], cwd: &Path) -> ShipResult<Command> {
  let (program, args) = argv.split_first().ok_or_else(|| ToolError::Spawn {
    program: "<empty>".to_string(),
    reason: "no program configured".to_string(),
  })?;

  let mut cmd = if cfg!(target_os = "windows") {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(program);
    cmd
  } else {
    Command::new(program)
  };
  cmd.args(args).current_dir(cwd);

  debug!("tool command in {}: {}", cwd.display(), display_command(argv));
  Ok(cmd)
}

/// Render an argv vector for messages
pub fn display_command(argv: &[String]) -> String {
  argv.join(" ")
}

/// Map a spawn failure to a tool error naming the program
pub fn spawn_error(argv: &[String], err: std::io::Error) -> ToolError {
  ToolError::Spawn {
    program: argv.first().cloned().unwrap_or_default(),
    reason: err.to_string(),
  }
}

/// Outcome of a cleanup pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
  pub killed: Vec<String>,
  pub failed: Vec<String>,
}

/// Kill processes whose name contains one of `patterns` (case-insensitive)
///
/// Best effort: a process that refuses to die is recorded in `failed`, never
/// turned into an error. The current process is always spared.
pub fn kill_matching_processes(patterns: &[String]) -> CleanupReport {
  let mut report = CleanupReport::default();
  if patterns.is_empty() {
    return report;
  }

  let needles: Vec<String> = patterns.iter().map(|p| p.to_lowercase()).collect();
  let current = sysinfo::get_current_pid().ok();

  let mut system = System::new();
  system.refresh_processes(ProcessesToUpdate::All, true);

  for (pid, process) in system.processes() {
    if Some(*pid) == current {
      continue;
    }
    let name = process.name().to_string_lossy().to_lowercase();
    if !matches_any(&name, &needles) {
      continue;
    }

    let label = format!("{} ({})", name, pid);
    if process.kill() {
      debug!("killed {}", label);
      report.killed.push(label);
    } else {
      warn!("could not kill {}", label);
      report.failed.push(label);
    }
  }

  report
}

fn matches_any(name: &str, needles: &[String]) -> bool {
  needles.iter().any(|needle| !needle.is_empty() && name.contains(needle.as_str()))
}
