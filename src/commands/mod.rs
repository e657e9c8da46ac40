//! CLI commands for apkship
//!
//! - **publish**: analyze, build, upload the release, publish metadata.json
//! - **push_metadata**: re-send the local metadata.json to the metadata repos
//! - **sheets_token**: fetch a Google OAuth token for the Sheets integration
//!
//! All commands accept `&ProjectContext` so ship.toml is loaded once.

pub mod publish;
pub mod push_metadata;
pub mod sheets_token;

pub use publish::{PublishMode, PublishOptions, run_publish};
pub use push_metadata::run_push_metadata;
pub use sheets_token::run_sheets_token;
