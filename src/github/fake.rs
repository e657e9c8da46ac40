//! In-memory GitHub used by unit tests
//!
//! Mirrors the API rules the publish flow depends on: uploading an asset whose
//! name is already attached fails with 422, and overwriting a file requires
//! the current SHA (409 otherwise).

use crate::core::error::{ApiError, ShipResult};
use crate::github::types::{NewRelease, PutFile, Release, ReleaseAsset};
use crate::github::{ContentsApi, ReleaseApi};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct StoredFile {
  pub sha: String,
  pub content: Vec<u8>,
  pub message: String,
}

#[derive(Default)]
struct State {
  next_id: u64,
  releases: Vec<(String, Release, NewRelease)>,
  asset_bytes: HashMap<u64, Vec<u8>>,
  files: HashMap<(String, String), StoredFile>,
  failing_repos: HashSet<String>,
}

#[derive(Default)]
pub struct FakeGitHub {
  state: RefCell<State>,
}

fn status(operation: &str, code: u16, body: &str) -> crate::core::error::ShipError {
  ApiError::Status {
    operation: operation.to_string(),
    status: code,
    body: body.to_string(),
  }
  .into()
}

impl FakeGitHub {
  pub fn new() -> Self {
    Self::default()
  }

  /// Every write to `repo` fails with 500
  pub fn fail_repo(&self, repo: &str) {
    self.state.borrow_mut().failing_repos.insert(repo.to_string());
  }

  pub fn releases(&self, repo: &str) -> Vec<Release> {
    let state = self.state.borrow();
    state
      .releases
      .iter()
      .filter(|(r, _, _)| r == repo)
      .map(|(_, release, _)| release.clone())
      .collect()
  }

  pub fn release_body(&self, repo: &str, tag: &str) -> Option<String> {
    let state = self.state.borrow();
    state
      .releases
      .iter()
      .find(|(r, release, _)| r == repo && release.tag_name == tag)
      .map(|(_, _, new)| new.body.clone())
  }

  pub fn asset_bytes(&self, asset_id: u64) -> Option<Vec<u8>> {
    self.state.borrow().asset_bytes.get(&asset_id).cloned()
  }

  pub fn file(&self, repo: &str, path: &str) -> Option<StoredFile> {
    self
      .state
      .borrow()
      .files
      .get(&(repo.to_string(), path.to_string()))
      .cloned()
  }

  /// Seed an existing remote file
  pub fn seed_file(&self, repo: &str, path: &str, content: &[u8]) -> String {
    let sha = digest(content);
    self.state.borrow_mut().files.insert(
      (repo.to_string(), path.to_string()),
      StoredFile {
        sha: sha.clone(),
        content: content.to_vec(),
        message: "seed".to_string(),
      },
    );
    sha
  }

  fn next_id(state: &mut State) -> u64 {
    state.next_id += 1;
    state.next_id
  }
}

fn digest(content: &[u8]) -> String {
  format!("{:x}", Sha256::digest(content))
}

impl ReleaseApi for FakeGitHub {
  fn release_by_tag(&self, repo: &str, tag: &str) -> ShipResult<Option<Release>> {
    let state = self.state.borrow();
    Ok(
      state
        .releases
        .iter()
        .find(|(r, release, _)| r == repo && release.tag_name == tag)
        .map(|(_, release, _)| release.clone()),
    )
  }

  fn create_release(&self, repo: &str, release: &NewRelease) -> ShipResult<Release> {
    let mut state = self.state.borrow_mut();
    if state.failing_repos.contains(repo) {
      return Err(status("Create release", 500, "boom"));
    }
    if state
      .releases
      .iter()
      .any(|(r, existing, _)| r == repo && existing.tag_name == release.tag_name)
    {
      return Err(status("Create release", 422, "already_exists"));
    }

    let id = Self::next_id(&mut state);
    let created = Release {
      id,
      tag_name: release.tag_name.clone(),
      name: Some(release.name.clone()),
      html_url: Some(format!("https://github.com/{}/releases/tag/{}", repo, release.tag_name)),
      assets: Vec::new(),
    };
    state.releases.push((repo.to_string(), created.clone(), release.clone()));
    Ok(created)
  }

  fn update_release(&self, repo: &str, release_id: u64, release: &NewRelease) -> ShipResult<Release> {
    let mut state = self.state.borrow_mut();
    let entry = state
      .releases
      .iter_mut()
      .find(|(r, existing, _)| r == repo && existing.id == release_id)
      .ok_or_else(|| status("Update release", 404, "Not Found"))?;

    entry.1.name = Some(release.name.clone());
    entry.2 = release.clone();
    Ok(entry.1.clone())
  }

  fn delete_asset(&self, repo: &str, asset_id: u64) -> ShipResult<()> {
    let mut state = self.state.borrow_mut();
    let mut found = false;
    for (r, release, _) in state.releases.iter_mut() {
      if r == repo {
        let before = release.assets.len();
        release.assets.retain(|a| a.id != asset_id);
        found |= release.assets.len() != before;
      }
    }
    if !found {
      return Err(status("Delete release asset", 404, "Not Found"));
    }
    state.asset_bytes.remove(&asset_id);
    Ok(())
  }

  fn upload_asset(
    &self,
    repo: &str,
    release_id: u64,
    name: &str,
    _content_type: &str,
    bytes: Vec<u8>,
  ) -> ShipResult<ReleaseAsset> {
    let mut state = self.state.borrow_mut();
    if state.failing_repos.contains(repo) {
      return Err(status("Upload release asset", 500, "boom"));
    }
    let id = Self::next_id(&mut state);

    let (_, release, _) = state
      .releases
      .iter_mut()
      .find(|(r, existing, _)| r == repo && existing.id == release_id)
      .ok_or_else(|| status("Upload release asset", 404, "Not Found"))?;

    if release.assets.iter().any(|a| a.name == name) {
      return Err(status("Upload release asset", 422, "already_exists"));
    }

    let asset = ReleaseAsset {
      id,
      name: name.to_string(),
      browser_download_url: format!(
        "https://github.com/{}/releases/download/{}/{}",
        repo, release.tag_name, name
      ),
      size: bytes.len() as u64,
    };
    release.assets.push(asset.clone());
    state.asset_bytes.insert(id, bytes);
    Ok(asset)
  }
}

impl ContentsApi for FakeGitHub {
  fn file_sha(&self, repo: &str, path: &str, _branch: &str) -> ShipResult<Option<String>> {
    Ok(self.file(repo, path).map(|f| f.sha))
  }

  fn put_file(&self, repo: &str, path: &str, file: &PutFile) -> ShipResult<u16> {
    let mut state = self.state.borrow_mut();
    if state.failing_repos.contains(repo) {
      return Err(status("Write file contents", 500, "boom"));
    }

    let key = (repo.to_string(), path.to_string());
    let content = STANDARD
      .decode(&file.content)
      .map_err(|_| status("Write file contents", 422, "content is not valid Base64"))?;

    let code = match state.files.get(&key) {
      Some(existing) if file.sha.as_deref() != Some(existing.sha.as_str()) => {
        return Err(status("Write file contents", 409, "sha does not match"));
      }
      Some(_) => 200,
      None => 201,
    };

    state.files.insert(
      key,
      StoredFile {
        sha: digest(&content),
        content,
        message: file.message.clone(),
      },
    );
    Ok(code)
  }
}
