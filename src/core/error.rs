//! Error types for apkship with contextual messages
//!
//! Every failure is terminal for the current invocation. Errors are grouped by
//! where they come from so each one can carry a hint that tells the operator
//! what to fix before re-running.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Process exit code for any failure branch
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Main error type for apkship
#[derive(Debug)]
pub enum ShipError {
  /// Configuration errors (missing files, missing token, bad manifest)
  Config(ConfigError),

  /// External tool failures (analyzer, build tool)
  Tool(ToolError),

  /// Remote API failures
  Api(ApiError),

  /// OAuth flow failures
  OAuth(OAuthError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ShipError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ShipError::Message { message, context, help } => ShipError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ShipError::Io(err) => ShipError::Message {
        message: ctx_str,
        context: Some(format!("I/O error: {}", err)),
        help: None,
      },
      other => ShipError::Message {
        message: ctx_str,
        context: Some(other.to_string()),
        help: other.help_message(),
      },
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ShipError::Config(e) => e.help_message(),
      ShipError::Tool(e) => e.help_message(),
      ShipError::Api(e) => e.help_message(),
      ShipError::OAuth(e) => e.help_message(),
      ShipError::Message { help, .. } => help.clone(),
      ShipError::Io(_) => None,
    }
  }
}

impl fmt::Display for ShipError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShipError::Config(e) => write!(f, "{}", e),
      ShipError::Tool(e) => write!(f, "{}", e),
      ShipError::Api(e) => write!(f, "{}", e),
      ShipError::OAuth(e) => write!(f, "{}", e),
      ShipError::Io(e) => write!(f, "I/O error: {}", e),
      ShipError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ShipError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ShipError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ShipError {
  fn from(err: io::Error) -> Self {
    ShipError::Io(err)
  }
}

impl From<ConfigError> for ShipError {
  fn from(err: ConfigError) -> Self {
    ShipError::Config(err)
  }
}

impl From<ToolError> for ShipError {
  fn from(err: ToolError) -> Self {
    ShipError::Tool(err)
  }
}

impl From<ApiError> for ShipError {
  fn from(err: ApiError) -> Self {
    ShipError::Api(err)
  }
}

impl From<OAuthError> for ShipError {
  fn from(err: OAuthError) -> Self {
    ShipError::OAuth(err)
  }
}

impl From<toml_edit::de::Error> for ShipError {
  fn from(err: toml_edit::de::Error) -> Self {
    ShipError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ShipError {
  fn from(err: serde_json::Error) -> Self {
    ShipError::message(format!("JSON error: {}", err))
  }
}

impl From<serde_yaml::Error> for ShipError {
  fn from(err: serde_yaml::Error) -> Self {
    ShipError::message(format!("YAML error: {}", err))
  }
}

impl From<reqwest::Error> for ShipError {
  fn from(err: reqwest::Error) -> Self {
    ShipError::Api(ApiError::Transport {
      message: err.to_string(),
    })
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// A required file is absent
  NotFound { what: String, path: PathBuf },

  /// No GitHub token in the environment or the token file
  MissingToken { token_file: PathBuf },

  /// Missing required field in ship.toml
  MissingField { field: String },

  /// Manifest exists but its version can't be used
  InvalidManifest { path: PathBuf, reason: String },

  /// ship.toml holds a value that can't work
  Invalid { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { what, .. } if what == "client secrets" => Some(
        "Download the OAuth client file (Desktop app) from Google Cloud Console > APIs & Services > Credentials."
          .to_string(),
      ),
      ConfigError::NotFound { what, .. } if what == "manifest" => {
        Some("Run apkship from the Flutter project root, or pass -C <dir>.".to_string())
      }
      ConfigError::NotFound { what, .. } if what == "metadata file" => {
        Some("Run `apkship publish` first, or pass --file <path>.".to_string())
      }
      ConfigError::NotFound { .. } => None,
      ConfigError::MissingToken { token_file } => Some(format!(
        "Create a token at https://github.com/settings/tokens (scope: repo), then export GITHUB_TOKEN or save it to '{}'.",
        token_file.display()
      )),
      ConfigError::MissingField { field } => Some(format!("Set `{}` in ship.toml.", field)),
      ConfigError::InvalidManifest { .. } => {
        Some("The manifest version must look like `1.4.2+23` (name + build number).".to_string())
      }
      ConfigError::Invalid { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { what, path } => {
        write!(f, "No {} found.\nExpected file: {}", what, path.display())
      }
      ConfigError::MissingToken { .. } => write!(f, "GITHUB_TOKEN is not configured"),
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::InvalidManifest { path, reason } => {
        write!(f, "Invalid manifest {}: {}", path.display(), reason)
      }
      ConfigError::Invalid { field, reason } => {
        write!(f, "Invalid config value for {}: {}", field, reason)
      }
    }
  }
}

/// External tool errors
#[derive(Debug)]
pub enum ToolError {
  /// The tool could not be started at all
  Spawn { program: String, reason: String },

  /// The analyzer reported error-severity issues
  LintFailed { errors: usize, warnings: usize },

  /// The build tool exited non-zero
  BuildFailed { command: String, code: Option<i32> },

  /// The build succeeded but the artifact isn't where it should be
  ArtifactMissing { path: PathBuf },
}

impl ToolError {
  fn help_message(&self) -> Option<String> {
    match self {
      ToolError::Spawn { program, .. } => Some(format!("Make sure `{}` is installed and on PATH.", program)),
      ToolError::LintFailed { .. } => Some("Fix the reported errors, then run `apkship publish --check` again.".to_string()),
      ToolError::ArtifactMissing { .. } => {
        Some("Check `paths.artifact` in ship.toml matches the build tool's output.".to_string())
      }
      ToolError::BuildFailed { .. } => None,
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::Spawn { program, reason } => write!(f, "Failed to run {}: {}", program, reason),
      ToolError::LintFailed { errors, warnings } => {
        write!(f, "Analyzer reported {} error(s) and {} warning(s)", errors, warnings)
      }
      ToolError::BuildFailed { command, code } => match code {
        Some(code) => write!(f, "Build failed: `{}` exited with code {}", command, code),
        None => write!(f, "Build failed: `{}` was terminated by a signal", command),
      },
      ToolError::ArtifactMissing { path } => {
        write!(f, "Build finished but no artifact at {}", path.display())
      }
    }
  }
}

/// Remote API errors
#[derive(Debug)]
pub enum ApiError {
  /// Non-2xx response
  Status {
    operation: String,
    status: u16,
    body: String,
  },

  /// Connection, TLS or decoding failure
  Transport { message: String },
}

impl ApiError {
  fn help_message(&self) -> Option<String> {
    match self {
      ApiError::Status { status: 401, .. } => Some("The GitHub token was rejected. Check it hasn't expired.".to_string()),
      ApiError::Status { status: 403, .. } | ApiError::Status { status: 404, .. } => {
        Some("Check the repository name in ship.toml and that the token has `repo` scope.".to_string())
      }
      ApiError::Status { status: 422, .. } => {
        Some("GitHub rejected the payload. An asset with the same name may still be attached.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Status { operation, status, body } => {
        write!(f, "{} failed: HTTP {}", operation, status)?;
        if !body.is_empty() {
          write!(f, "\n{}", body)?;
        }
        Ok(())
      }
      ApiError::Transport { message } => write!(f, "HTTP request failed: {}", message),
    }
  }
}

/// OAuth flow errors
#[derive(Debug)]
pub enum OAuthError {
  /// The provider redirected back with `error=...`
  Denied { reason: String },

  /// The redirect carried a state we didn't issue
  StateMismatch,

  /// The redirect had neither a code nor an error
  MissingCode,

  /// The token endpoint refused the request
  TokenEndpoint { status: u16, body: String },

  /// The client secrets file has no `installed` or `web` section
  MalformedSecrets { reason: String },
}

impl OAuthError {
  fn help_message(&self) -> Option<String> {
    match self {
      OAuthError::Denied { .. } => Some("Run the command again and approve access in the browser.".to_string()),
      OAuthError::StateMismatch => Some("Close stale consent tabs and retry.".to_string()),
      OAuthError::MalformedSecrets { .. } => {
        Some("Re-download the OAuth client JSON from Google Cloud Console.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for OAuthError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OAuthError::Denied { reason } => write!(f, "Authorization was denied: {}", reason),
      OAuthError::StateMismatch => write!(f, "OAuth state mismatch in redirect"),
      OAuthError::MissingCode => write!(f, "OAuth redirect did not include an authorization code"),
      OAuthError::TokenEndpoint { status, body } => {
        write!(f, "Token endpoint returned HTTP {}\n{}", status, body)
      }
      OAuthError::MalformedSecrets { reason } => write!(f, "Malformed client secrets: {}", reason),
    }
  }
}

/// Result type alias for apkship
pub type ShipResult<T> = Result<T, ShipError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ShipError>,
{
  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ShipError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
