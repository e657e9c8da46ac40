//! GitHub hosting: releases, release assets and repository contents
//!
//! The publish flow talks to these two traits rather than to HTTP directly,
//! which keeps the create-or-update and force-push logic testable against the
//! in-memory host in `fake`.

pub mod client;
pub mod types;

#[cfg(test)]
pub mod fake;

pub use client::GitHubClient;
pub use types::{NewRelease, PutFile, Release, ReleaseAsset};

use crate::core::error::ShipResult;

/// Releases and release assets
pub trait ReleaseApi {
  /// Release for `tag`, or `None` when the tag has no release
  fn release_by_tag(&self, repo: &str, tag: &str) -> ShipResult<Option<Release>>;

  fn create_release(&self, repo: &str, release: &NewRelease) -> ShipResult<Release>;

  fn update_release(&self, repo: &str, release_id: u64, release: &NewRelease) -> ShipResult<Release>;

  fn delete_asset(&self, repo: &str, asset_id: u64) -> ShipResult<()>;

  fn upload_asset(
    &self,
    repo: &str,
    release_id: u64,
    name: &str,
    content_type: &str,
    bytes: Vec<u8>,
  ) -> ShipResult<ReleaseAsset>;
}

/// Repository file contents
pub trait ContentsApi {
  /// Current blob SHA of `path` on `branch`, `None` when it doesn't exist
  fn file_sha(&self, repo: &str, path: &str, branch: &str) -> ShipResult<Option<String>>;

  /// Create or overwrite `path`; returns the HTTP status (200 updated, 201 created)
  fn put_file(&self, repo: &str, path: &str, file: &PutFile) -> ShipResult<u16>;
}
