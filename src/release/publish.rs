//! Release upload and metadata publication
//!
//! `publish_artifact` is idempotent per tag: re-running it for the same
//! version reuses the release, drops any asset with the artifact's extension
//! and attaches the new upload, so the release always ends up with exactly
//! one such asset.

use crate::core::error::ShipResult;
use crate::flutter::AppVersion;
use crate::github::{ContentsApi, NewRelease, PutFile, Release, ReleaseApi};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{info, warn};

const APK_CONTENT_TYPE: &str = "application/vnd.android.package-archive";
const OCTET_STREAM: &str = "application/octet-stream";

/// Everything needed to publish one artifact
#[derive(Debug, Clone)]
pub struct ArtifactUpload<'a> {
  pub repo: &'a str,
  pub app_name: &'a str,
  pub asset_prefix: &'a str,
  pub version: &'a AppVersion,
  pub notes: &'a str,
  /// Lowercase extension without the dot, e.g. `apk`
  pub extension: &'a str,
  pub bytes: Vec<u8>,
}

impl ArtifactUpload<'_> {
  pub fn asset_name(&self) -> String {
    format!("{}_{}.{}", self.asset_prefix, self.version.name, self.extension)
  }

  fn content_type(&self) -> &'static str {
    if self.extension.eq_ignore_ascii_case("apk") {
      APK_CONTENT_TYPE
    } else {
      OCTET_STREAM
    }
  }

  fn release_payload(&self) -> NewRelease {
    NewRelease {
      tag_name: self.version.tag(),
      name: format!("{} v{}", self.app_name, self.version.name),
      body: self.notes.to_string(),
      draft: false,
      prerelease: false,
    }
  }
}

/// Where the artifact ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedArtifact {
  pub release_id: u64,
  pub tag: String,
  pub download_url: String,
  pub replaced_assets: Vec<String>,
  pub created_release: bool,
}

/// Create or update the release for the version tag and upload the artifact
pub fn publish_artifact<A: ReleaseApi + ?Sized>(
  api: &A,
  upload: ArtifactUpload<'_>,
) -> ShipResult<PublishedArtifact> {
  let tag = upload.version.tag();
  let payload = upload.release_payload();

  let (release, created_release) = match api.release_by_tag(upload.repo, &tag)? {
    Some(existing) => {
      println!("ℹ️  Release {} already exists, updating it", tag);
      let updated = api.update_release(upload.repo, existing.id, &payload)?;
      (merge_assets(updated, existing), false)
    }
    None => {
      let created = api.create_release(upload.repo, &payload)?;
      println!("✅ Created release {}", tag);
      (created, true)
    }
  };

  let suffix = format!(".{}", upload.extension.to_lowercase());
  let mut replaced_assets = Vec::new();
  for asset in release
    .assets
    .iter()
    .filter(|a| a.name.to_lowercase().ends_with(&suffix))
  {
    api.delete_asset(upload.repo, asset.id)?;
    println!("   Removed old asset: {}", asset.name);
    replaced_assets.push(asset.name.clone());
  }

  let name = upload.asset_name();
  let content_type = upload.content_type();
  info!("uploading {} ({} bytes) to release {}", name, upload.bytes.len(), release.id);
  let asset = api.upload_asset(upload.repo, release.id, &name, content_type, upload.bytes)?;

  Ok(PublishedArtifact {
    release_id: release.id,
    tag,
    download_url: asset.browser_download_url,
    replaced_assets,
    created_release,
  })
}

// Some PATCH responses omit assets; fall back to what the lookup returned
fn merge_assets(mut updated: Release, existing: Release) -> Release {
  if updated.assets.is_empty() {
    updated.assets = existing.assets;
  }
  updated
}

/// Result of writing metadata to one repo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
  pub repo: String,
  /// HTTP status on success, error text on failure
  pub result: Result<u16, String>,
}

impl PushOutcome {
  pub fn succeeded(&self) -> bool {
    self.result.is_ok()
  }
}

/// Create or overwrite `path` in each repo with `content`
///
/// The current SHA is fetched right before each write. Failures are returned
/// per repo; this never fails as a whole.
pub fn push_file<C: ContentsApi + ?Sized>(
  api: &C,
  repos: &[String],
  path: &str,
  branch: &str,
  content: &str,
  message: &str,
) -> Vec<PushOutcome> {
  let encoded = STANDARD.encode(content.as_bytes());

  repos
    .iter()
    .map(|repo| {
      let result = api
        .file_sha(repo, path, branch)
        .and_then(|sha| {
          info!("{}/{}: existing sha {:?}", repo, path, sha);
          let body = PutFile {
            message: message.to_string(),
            content: encoded.clone(),
            branch: branch.to_string(),
            sha,
          };
          api.put_file(repo, path, &body)
        })
        .map_err(|e| {
          warn!("writing {} to {} failed: {}", path, repo, e);
          e.to_string()
        });

      PushOutcome {
        repo: repo.clone(),
        result,
      }
    })
    .collect()
}
