//! Installed-app authorization flow with a loopback redirect
//!
//! 1. Listen on `127.0.0.1` with an OS-assigned port
//! 2. Send the operator's browser to the consent screen (PKCE S256 + state)
//! 3. Accept the single redirect, answer it with a short page
//! 4. Exchange the code at the token endpoint

use crate::core::error::{OAuthError, ShipError, ShipResult};
use crate::oauth::credentials::{StoredCredentials, TokenResponse};
use crate::oauth::secrets::ClientSecrets;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use log::{debug, warn};
use rand::Rng;
use rand::distributions::Alphanumeric;
use reqwest::Url;
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tiny_http::{Header, Response, Server, StatusCode};

const SUCCESS_PAGE: &str = "<html><body><p>The authentication flow has completed. You may close this window.</p></body></html>";

/// PKCE verifier/challenge pair (RFC 7636, S256)
#[derive(Debug, Clone)]
pub struct Pkce {
  pub verifier: String,
  pub challenge: String,
}

impl Pkce {
  pub fn generate() -> Self {
    Self::from_verifier(random_token(64))
  }

  pub fn from_verifier(verifier: String) -> Self {
    let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
    Self { verifier, challenge }
  }
}

fn random_token(len: usize) -> String {
  rand::thread_rng()
    .sample_iter(&Alphanumeric)
    .take(len)
    .map(char::from)
    .collect()
}

/// Consent screen URL
pub fn authorization_url(
  client: &ClientSecrets,
  scopes: &[String],
  redirect_uri: &str,
  state: &str,
  pkce: &Pkce,
) -> ShipResult<Url> {
  let scope = scopes.join(" ");
  Url::parse_with_params(
    &client.auth_uri,
    &[
      ("response_type", "code"),
      ("client_id", client.client_id.as_str()),
      ("redirect_uri", redirect_uri),
      ("scope", scope.as_str()),
      ("state", state),
      ("code_challenge", pkce.challenge.as_str()),
      ("code_challenge_method", "S256"),
      ("access_type", "offline"),
      ("prompt", "consent"),
    ],
  )
  .map_err(|e| {
    OAuthError::MalformedSecrets {
      reason: format!("auth_uri '{}' is not a URL: {}", client.auth_uri, e),
    }
    .into()
  })
}

/// Query parameters of a request target (`/?code=..&state=..`)
///
/// `None` for targets without a query (favicon requests and the like).
pub fn redirect_params(target: &str) -> Option<HashMap<String, String>> {
  if !target.contains('?') {
    return None;
  }

  let url = Url::parse(&format!("http://127.0.0.1{}", target)).ok()?;
  Some(url.query_pairs().into_owned().collect())
}

/// Block until the browser hits the redirect URI, return its query parameters
///
/// Connections that never form a valid HTTP request are dropped by the
/// server and don't end the wait.
pub fn wait_for_redirect(server: &Server) -> ShipResult<HashMap<String, String>> {
  loop {
    let request = server.recv()?;
    debug!("redirect request: {} {}", request.method(), request.url());

    let Some(params) = redirect_params(request.url()) else {
      if let Err(e) = request.respond(Response::empty(StatusCode(404))) {
        debug!("failed to answer request: {}", e);
      }
      continue;
    };

    let mut page = Response::from_string(SUCCESS_PAGE);
    if let Ok(header) = "Content-Type: text/html; charset=utf-8".parse::<Header>() {
      page = page.with_header(header);
    }
    if let Err(e) = request.respond(page) {
      debug!("failed to answer redirect: {}", e);
    }
    return Ok(params);
  }
}

/// Check state, pull out the code
pub fn authorization_code(params: &HashMap<String, String>, expected_state: &str) -> ShipResult<String> {
  if let Some(error) = params.get("error") {
    return Err(OAuthError::Denied { reason: error.clone() }.into());
  }
  if params.get("state").map(String::as_str) != Some(expected_state) {
    return Err(OAuthError::StateMismatch.into());
  }
  params
    .get("code")
    .cloned()
    .ok_or_else(|| OAuthError::MissingCode.into())
}

/// Run the whole interactive flow
pub fn authorize_interactive(
  http: &Client,
  client: &ClientSecrets,
  scopes: &[String],
  open_browser: bool,
) -> ShipResult<StoredCredentials> {
  let server = Server::http(("127.0.0.1", 0))
    .map_err(|e| ShipError::message(format!("Failed to start the redirect listener: {}", e)))?;
  let port = server
    .server_addr()
    .to_ip()
    .map(|addr| addr.port())
    .ok_or_else(|| ShipError::message("Redirect listener has no IP address"))?;
  let redirect_uri = format!("http://127.0.0.1:{}/", port);

  let pkce = Pkce::generate();
  let state = random_token(30);
  let url = authorization_url(client, scopes, &redirect_uri, &state, &pkce)?;

  println!("Please visit this URL to authorize this application:");
  println!("{}", url);
  if open_browser && let Err(e) = open::that(url.as_str()) {
    warn!("could not open a browser: {}", e);
    println!("⚠️  Could not open a browser, open the URL above manually");
  }

  let params = wait_for_redirect(&server)?;
  let code = authorization_code(&params, &state)?;

  let form = vec![
    ("grant_type", "authorization_code".to_string()),
    ("code", code),
    ("redirect_uri", redirect_uri),
    ("client_id", client.client_id.clone()),
    ("code_verifier", pkce.verifier),
  ];
  let response = token_request(http, &client.token_uri, form, client.client_secret.as_deref())?;
  Ok(StoredCredentials::from_response(client, scopes, response, Utc::now()))
}

/// Exchange the refresh token for a new access token, in place
pub fn refresh(http: &Client, creds: &mut StoredCredentials) -> ShipResult<()> {
  let refresh_token = creds.refresh_token.clone().unwrap_or_default();
  let form = vec![
    ("grant_type", "refresh_token".to_string()),
    ("refresh_token", refresh_token),
    ("client_id", creds.client_id.clone()),
  ];
  let response = token_request(http, &creds.token_uri, form, creds.client_secret.as_deref())?;
  creds.apply(response, Utc::now());
  Ok(())
}

fn token_request(
  http: &Client,
  token_uri: &str,
  mut form: Vec<(&'static str, String)>,
  client_secret: Option<&str>,
) -> ShipResult<TokenResponse> {
  if let Some(secret) = client_secret {
    form.push(("client_secret", secret.to_string()));
  }

  let response = http.post(token_uri).form(&form).send()?;
  let status = response.status();
  debug!("token endpoint -> {}", status);
  if !status.is_success() {
    let body = response.text().unwrap_or_default();
    return Err(
      OAuthError::TokenEndpoint {
        status: status.as_u16(),
        body,
      }
      .into(),
    );
  }
  Ok(response.json()?)
}
