use crate::core::error::{ConfigError, ResultExt, ShipError, ShipResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for apkship
/// Searched in order: ship.toml, .ship.toml, .config/ship.toml
///
/// Every field has a default, so a Flutter project with no config file at all
/// works for the local steps (`publish --check`, `publish --build`). Publishing
/// needs at least `github.repo` and `github.metadata_repos`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipConfig {
  #[serde(default)]
  pub app: AppConfig,
  #[serde(default)]
  pub paths: PathsConfig,
  #[serde(default)]
  pub github: GithubConfig,
  #[serde(default)]
  pub analyze: AnalyzeConfig,
  #[serde(default)]
  pub build: BuildConfig,
  #[serde(default)]
  pub oauth: OAuthConfig,
}

/// Naming of the published app
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
  /// Display name used in release titles and generated notes
  #[serde(default = "default_app_name")]
  pub name: String,

  /// Uploaded asset is named `{asset_prefix}_{version}.{ext}`
  #[serde(default = "default_asset_prefix")]
  pub asset_prefix: String,
}

fn default_app_name() -> String {
  "App".to_string()
}

fn default_asset_prefix() -> String {
  "app".to_string()
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      name: default_app_name(),
      asset_prefix: default_asset_prefix(),
    }
  }
}

/// Project-relative file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
  #[serde(default = "default_manifest")]
  pub manifest: PathBuf,
  #[serde(default = "default_artifact")]
  pub artifact: PathBuf,
  #[serde(default = "default_release_notes_dir")]
  pub release_notes_dir: PathBuf,
  #[serde(default = "default_metadata")]
  pub metadata: PathBuf,
}

fn default_manifest() -> PathBuf {
  PathBuf::from("pubspec.yaml")
}

fn default_artifact() -> PathBuf {
  ["build", "app", "outputs", "flutter-apk", "app-release.apk"].iter().collect()
}

fn default_release_notes_dir() -> PathBuf {
  PathBuf::from("release_notes")
}

fn default_metadata() -> PathBuf {
  PathBuf::from("metadata.json")
}

impl Default for PathsConfig {
  fn default() -> Self {
    Self {
      manifest: default_manifest(),
      artifact: default_artifact(),
      release_notes_dir: default_release_notes_dir(),
      metadata: default_metadata(),
    }
  }
}

/// GitHub hosting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
  /// `owner/name` of the repo that holds the releases
  #[serde(default)]
  pub repo: Option<String>,

  /// Repos that receive metadata.json (usually one public updates repo)
  #[serde(default)]
  pub metadata_repos: Vec<String>,

  /// Path of the metadata file inside the metadata repos
  #[serde(default = "default_metadata_remote_path")]
  pub metadata_path: String,

  /// Branch the metadata commit goes to
  #[serde(default = "default_branch")]
  pub branch: String,

  /// Fallback token file when GITHUB_TOKEN isn't set
  #[serde(default = "default_token_file")]
  pub token_file: PathBuf,

  #[serde(default = "default_api_url")]
  pub api_url: String,

  #[serde(default = "default_uploads_url")]
  pub uploads_url: String,
}

fn default_metadata_remote_path() -> String {
  "metadata.json".to_string()
}

fn default_branch() -> String {
  "main".to_string()
}

fn default_token_file() -> PathBuf {
  ["tool", ".github_token"].iter().collect()
}

fn default_api_url() -> String {
  "https://api.github.com".to_string()
}

fn default_uploads_url() -> String {
  "https://uploads.github.com".to_string()
}

impl Default for GithubConfig {
  fn default() -> Self {
    Self {
      repo: None,
      metadata_repos: Vec::new(),
      metadata_path: default_metadata_remote_path(),
      branch: default_branch(),
      token_file: default_token_file(),
      api_url: default_api_url(),
      uploads_url: default_uploads_url(),
    }
  }
}

impl GithubConfig {
  /// Release repo, or a config error naming the missing field
  pub fn require_repo(&self) -> ShipResult<&str> {
    self.repo.as_deref().ok_or_else(|| {
      ShipError::Config(ConfigError::MissingField {
        field: "github.repo".to_string(),
      })
    })
  }

  /// Metadata repos, or a config error when none are configured
  pub fn require_metadata_repos(&self) -> ShipResult<&[String]> {
    if self.metadata_repos.is_empty() {
      return Err(ShipError::Config(ConfigError::MissingField {
        field: "github.metadata_repos".to_string(),
      }));
    }
    Ok(&self.metadata_repos)
  }
}

/// Static analysis step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeConfig {
  #[serde(default = "default_analyze_command")]
  pub command: Vec<String>,
}

fn default_analyze_command() -> Vec<String> {
  vec!["flutter".to_string(), "analyze".to_string()]
}

impl Default for AnalyzeConfig {
  fn default() -> Self {
    Self {
      command: default_analyze_command(),
    }
  }
}

/// Build step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
  #[serde(default = "default_build_command")]
  pub command: Vec<String>,

  /// Files and directories whose mtimes decide whether the artifact is stale
  #[serde(default = "default_sources")]
  pub sources: Vec<PathBuf>,

  /// Extensions tracked inside source directories
  #[serde(default = "default_source_extensions")]
  pub source_extensions: Vec<String>,

  /// Process name patterns killed after the build (empty disables cleanup)
  #[serde(default = "default_cleanup_processes")]
  pub cleanup_processes: Vec<String>,
}

fn default_build_command() -> Vec<String> {
  [
    "flutter",
    "build",
    "apk",
    "--target-platform",
    "android-arm64",
    "--release",
    "--no-pub",
  ]
  .iter()
  .map(|s| s.to_string())
  .collect()
}

fn default_sources() -> Vec<PathBuf> {
  vec![PathBuf::from("pubspec.yaml"), PathBuf::from("lib")]
}

fn default_source_extensions() -> Vec<String> {
  vec!["dart".to_string()]
}

fn default_cleanup_processes() -> Vec<String> {
  vec!["java".to_string(), "gradle".to_string()]
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      command: default_build_command(),
      sources: default_sources(),
      source_extensions: default_source_extensions(),
      cleanup_processes: default_cleanup_processes(),
    }
  }
}

/// Google OAuth token fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
  #[serde(default = "default_client_secrets")]
  pub client_secrets: PathBuf,
  #[serde(default = "default_token_cache")]
  pub token_cache: PathBuf,
  #[serde(default = "default_scopes")]
  pub scopes: Vec<String>,
}

fn default_client_secrets() -> PathBuf {
  ["tool", "credentials.json"].iter().collect()
}

fn default_token_cache() -> PathBuf {
  ["tool", "sheets_token.json"].iter().collect()
}

fn default_scopes() -> Vec<String> {
  vec![
    "https://www.googleapis.com/auth/spreadsheets".to_string(),
    "https://www.googleapis.com/auth/drive.file".to_string(),
  ]
}

impl Default for OAuthConfig {
  fn default() -> Self {
    Self {
      client_secrets: default_client_secrets(),
      token_cache: default_token_cache(),
      scopes: default_scopes(),
    }
  }
}

impl ShipConfig {
  /// Find config file in search order: ship.toml, .ship.toml, .config/ship.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("ship.toml"),
      path.join(".ship.toml"),
      path.join(".config").join("ship.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config, falling back to defaults when no file exists
  pub fn load(path: &Path) -> ShipResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      log::debug!("no ship.toml under {}, using defaults", path.display());
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ShipConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    log::debug!("loaded config from {}", config_path.display());
    Ok(config)
  }

  /// Validate values that would only fail much later at runtime
  pub fn validate(&self) -> ShipResult<()> {
    if self.analyze.command.is_empty() {
      return Err(invalid("analyze.command", "must name a program"));
    }
    if self.build.command.is_empty() {
      return Err(invalid("build.command", "must name a program"));
    }

    if let Some(repo) = &self.github.repo {
      validate_repo_name("github.repo", repo)?;
    }
    for repo in &self.github.metadata_repos {
      validate_repo_name("github.metadata_repos", repo)?;
    }

    if self.app.asset_prefix.trim().is_empty() || self.app.asset_prefix.contains('/') {
      return Err(invalid("app.asset_prefix", "must be a plain file name prefix"));
    }

    Ok(())
  }
}

fn validate_repo_name(field: &str, repo: &str) -> ShipResult<()> {
  let mut parts = repo.split('/');
  let owner = parts.next().unwrap_or_default();
  let name = parts.next().unwrap_or_default();
  if owner.is_empty() || name.is_empty() || parts.next().is_some() {
    return Err(invalid(field, &format!("'{}' is not in owner/name form", repo)));
  }
  Ok(())
}

fn invalid(field: &str, reason: &str) -> ShipError {
  ShipError::Config(ConfigError::Invalid {
    field: field.to_string(),
    reason: reason.to_string(),
  })
}
