//! Skip-build-if-unchanged check
//!
//! The artifact is considered fresh when its mtime is later than the mtime of
//! every tracked source: plain files are compared directly, directories are
//! walked recursively and only files with a tracked extension count.

use std::fs;
use std::path::Path;
use std::time::SystemTime;
use walkdir::WalkDir;

/// True when `artifact` exists and is newer than every tracked source
pub fn should_skip_build(artifact: &Path, sources: &[impl AsRef<Path>], extensions: &[String]) -> bool {
  let Some(artifact_mtime) = modified(artifact) else {
    return false;
  };

  for source in sources {
    let source = source.as_ref();
    if source.is_file() {
      if is_newer(source, artifact_mtime) {
        log::debug!("{} is newer than the artifact", source.display());
        return false;
      }
      continue;
    }

    if !source.is_dir() {
      continue;
    }

    let stale = WalkDir::new(source)
      .into_iter()
      .filter_map(Result::ok)
      .filter(|entry| entry.file_type().is_file())
      .filter(|entry| has_tracked_extension(entry.path(), extensions))
      .find(|entry| is_newer(entry.path(), artifact_mtime));

    if let Some(entry) = stale {
      log::debug!("{} is newer than the artifact", entry.path().display());
      return false;
    }
  }

  true
}

fn modified(path: &Path) -> Option<SystemTime> {
  fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn is_newer(path: &Path, than: SystemTime) -> bool {
  // An unreadable mtime can't prove freshness
  modified(path).is_none_or(|mtime| mtime > than)
}

fn has_tracked_extension(path: &Path, extensions: &[String]) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| extensions.iter().any(|tracked| tracked.eq_ignore_ascii_case(ext)))
}
