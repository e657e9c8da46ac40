mod commands;
mod core;
mod flutter;
mod github;
mod oauth;
mod release;
mod ui;

use clap::{ArgAction, Parser, Subcommand};
use commands::{PublishMode, PublishOptions};
use core::error::{FAILURE_EXIT_CODE, ShipError, print_error};
use env_logger::Env;
use std::path::PathBuf;

/// Build, release and announce Flutter Android builds on GitHub
#[derive(Parser)]
#[command(name = "apkship")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Increase log verbosity (-v info, -vv debug)
  #[arg(short, long, action = ArgAction::Count, global = true)]
  verbose: u8,

  /// Run as if started in <DIR>
  #[arg(short = 'C', value_name = "DIR", global = true)]
  directory: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Analyze, build, upload the APK to GitHub Releases and publish metadata.json
  Publish {
    /// Only run the analyzer gate
    #[arg(long, conflicts_with_all = ["build", "skip_check", "force_build"])]
    check: bool,
    /// Only build the APK
    #[arg(long, conflicts_with = "skip_check")]
    build: bool,
    /// Skip the analyzer gate in the full pipeline
    #[arg(long)]
    skip_check: bool,
    /// Build even when the APK is newer than all sources
    #[arg(long)]
    force_build: bool,
  },

  /// Re-send the local metadata.json to the metadata repos
  PushMetadata {
    /// Metadata file to send (default: paths.metadata from ship.toml)
    #[arg(long)]
    file: Option<PathBuf>,
    /// Commit message (default: derived from the file)
    #[arg(short, long)]
    message: Option<String>,
  },

  /// Fetch a Google OAuth token for the Sheets integration
  SheetsToken {
    /// Print the authorization URL without opening a browser
    #[arg(long)]
    no_browser: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_logging(verbose: u8) {
  let default_filter = match verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  env_logger::Builder::from_env(Env::new().filter_or("APKSHIP_LOG", default_filter))
    .format_timestamp(None)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let project_root = match cli.directory {
    Some(dir) => dir,
    None => match std::env::current_dir() {
      Ok(dir) => dir,
      Err(e) => handle_error(ShipError::message(format!("Failed to get current directory: {}", e))),
    },
  };
  log::debug!("project root: {}", project_root.display());

  // Load ship.toml once; every command reads it through the context
  let ctx = match core::context::ProjectContext::build(&project_root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Publish {
      check,
      build,
      skip_check,
      force_build,
    } => {
      let mode = if check {
        PublishMode::Check
      } else if build {
        PublishMode::Build
      } else {
        PublishMode::Full
      };
      commands::run_publish(
        &ctx,
        PublishOptions {
          mode,
          skip_check,
          force_build,
        },
      )
    }
    Commands::PushMetadata { file, message } => commands::run_push_metadata(&ctx, file, message),
    Commands::SheetsToken { no_browser } => commands::run_sheets_token(&ctx, !no_browser),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ShipError) -> ! {
  print_error(&err);
  std::process::exit(FAILURE_EXIT_CODE);
}
