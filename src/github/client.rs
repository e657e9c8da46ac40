//! Blocking GitHub REST client
//!
//! One request per call, no retries, default client timeouts. Any non-2xx
//! response is turned into `ApiError::Status` carrying the response body.

use crate::core::config::GithubConfig;
use crate::core::error::{ApiError, ShipResult};
use crate::github::types::{ContentFile, NewRelease, PutFile, Release, ReleaseAsset};
use crate::github::{ContentsApi, ReleaseApi};
use crate::ui::progress::ProgressReader;
use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::{Body, Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use std::io::Cursor;

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

pub struct GitHubClient {
  http: Client,
  api_url: String,
  uploads_url: String,
  token: String,
}

impl GitHubClient {
  pub fn new(config: &GithubConfig, token: impl Into<String>) -> ShipResult<Self> {
    let http = Client::builder()
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self::with_http(config, token, http))
  }

  /// Client on top of an already configured HTTP client
  pub fn with_http(config: &GithubConfig, token: impl Into<String>, http: Client) -> Self {
    Self {
      http,
      api_url: config.api_url.trim_end_matches('/').to_string(),
      uploads_url: config.uploads_url.trim_end_matches('/').to_string(),
      token: token.into(),
    }
  }

  fn api(&self, path: &str) -> String {
    format!("{}{}", self.api_url, path)
  }

  fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
    builder
      .header(AUTHORIZATION, format!("token {}", self.token))
      .header(ACCEPT, ACCEPT_V3)
  }
}

/// Pass 2xx responses through, turn everything else into `ApiError::Status`
fn expect_success(operation: &str, response: Response) -> ShipResult<Response> {
  let status = response.status();
  debug!("{} -> {}", operation, status);
  if status.is_success() {
    return Ok(response);
  }

  let body = response.text().unwrap_or_default();
  Err(
    ApiError::Status {
      operation: operation.to_string(),
      status: status.as_u16(),
      body,
    }
    .into(),
  )
}

impl ReleaseApi for GitHubClient {
  fn release_by_tag(&self, repo: &str, tag: &str) -> ShipResult<Option<Release>> {
    let url = self.api(&format!("/repos/{}/releases/tags/{}", repo, tag));
    let response = self.authorized(self.http.get(&url)).send()?;

    if response.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    let response = expect_success("Look up release", response)?;
    Ok(Some(response.json()?))
  }

  fn create_release(&self, repo: &str, release: &NewRelease) -> ShipResult<Release> {
    let url = self.api(&format!("/repos/{}/releases", repo));
    let response = self.authorized(self.http.post(&url)).json(release).send()?;
    Ok(expect_success("Create release", response)?.json()?)
  }

  fn update_release(&self, repo: &str, release_id: u64, release: &NewRelease) -> ShipResult<Release> {
    let url = self.api(&format!("/repos/{}/releases/{}", repo, release_id));
    let response = self.authorized(self.http.patch(&url)).json(release).send()?;
    Ok(expect_success("Update release", response)?.json()?)
  }

  fn delete_asset(&self, repo: &str, asset_id: u64) -> ShipResult<()> {
    let url = self.api(&format!("/repos/{}/releases/assets/{}", repo, asset_id));
    let response = self.authorized(self.http.delete(&url)).send()?;
    expect_success("Delete release asset", response)?;
    Ok(())
  }

  fn upload_asset(
    &self,
    repo: &str,
    release_id: u64,
    name: &str,
    content_type: &str,
    bytes: Vec<u8>,
  ) -> ShipResult<ReleaseAsset> {
    let url = format!("{}/repos/{}/releases/{}/assets", self.uploads_url, repo, release_id);
    let len = bytes.len();
    let reader = ProgressReader::new(Cursor::new(bytes), len, format!("Uploading {}", name));

    let response = self
      .authorized(self.http.post(&url))
      .query(&[("name", name)])
      .header(CONTENT_TYPE, content_type)
      .body(Body::sized(reader, len as u64))
      .send()?;

    Ok(expect_success("Upload release asset", response)?.json()?)
  }
}

impl ContentsApi for GitHubClient {
  fn file_sha(&self, repo: &str, path: &str, branch: &str) -> ShipResult<Option<String>> {
    let url = self.api(&format!("/repos/{}/contents/{}", repo, path));
    let response = self
      .authorized(self.http.get(&url))
      .query(&[("ref", branch)])
      .send()?;

    // Anything but a readable file means "create", same as a missing file
    if !response.status().is_success() {
      debug!("contents lookup for {}/{} -> {}", repo, path, response.status());
      return Ok(None);
    }
    match response.json::<ContentFile>() {
      Ok(file) => Ok(Some(file.sha)),
      Err(e) => {
        debug!("contents response for {}/{} had no sha: {}", repo, path, e);
        Ok(None)
      }
    }
  }

  fn put_file(&self, repo: &str, path: &str, file: &PutFile) -> ShipResult<u16> {
    let url = self.api(&format!("/repos/{}/contents/{}", repo, path));
    let response = self.authorized(self.http.put(&url)).json(file).send()?;
    let response = expect_success("Write file contents", response)?;
    Ok(response.status().as_u16())
  }
}
