//! Release notes: per-version file or generated template

use crate::core::error::{ResultExt, ShipResult};
use crate::flutter::AppVersion;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// `{dir}/{version}.md`
pub fn notes_path(dir: &Path, version: &AppVersion) -> PathBuf {
  dir.join(format!("{}.md", version.name))
}

/// Read the per-version notes file, or synthesize notes for today
pub fn load_release_notes(dir: &Path, app_name: &str, version: &AppVersion) -> ShipResult<String> {
  let path = notes_path(dir, version);
  if path.is_file() {
    log::info!("using release notes from {}", path.display());
    return fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()));
  }

  log::info!("no {}, generating default notes", path.display());
  Ok(default_notes(app_name, version, chrono::Local::now().date_naive()))
}

/// Fixed template used when no notes file exists
pub fn default_notes(app_name: &str, version: &AppVersion, date: NaiveDate) -> String {
  format!(
    "# {app} v{name}\n\
     - **Version:** {name}\n\
     - **Build:** {code}\n\
     - **Release date:** {date}\n\
     \n\
     ## What's new\n\
     - Performance and stability improvements\n\
     - Minor bug fixes\n",
    app = app_name,
    name = version.name,
    code = version.code,
    date = date.format("%d/%m/%Y"),
  )
}
