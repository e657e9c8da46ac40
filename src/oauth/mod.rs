//! Google OAuth token fetching for the Sheets integration
//!
//! - **secrets**: the client secrets file downloaded from Google Cloud Console
//! - **credentials**: the cached token, refreshed or replaced as needed
//! - **flow**: loopback authorization with PKCE, code exchange and refresh

pub mod credentials;
pub mod flow;
pub mod secrets;

pub use credentials::StoredCredentials;
pub use secrets::ClientSecrets;
