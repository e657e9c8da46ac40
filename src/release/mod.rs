//! Release publication
//!
//! - **metadata**: the `metadata.json` record the app polls for updates
//! - **notes**: per-version release notes or the generated template
//! - **publish**: create-or-update the GitHub release, upload the artifact,
//!   write metadata to the updates repo(s)

pub mod metadata;
pub mod notes;
pub mod publish;

pub use metadata::UpdateMetadata;
pub use notes::load_release_notes;
pub use publish::{ArtifactUpload, publish_artifact, push_file};
