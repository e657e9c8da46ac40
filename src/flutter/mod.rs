//! Flutter project helpers
//!
//! - **manifest**: version name + build code from pubspec.yaml
//! - **analyze**: `flutter analyze` gate with severity counting
//! - **freshness**: skip the build when the APK is newer than the sources
//! - **build**: run the release build and clean up Gradle daemons

pub mod analyze;
pub mod build;
pub mod freshness;
pub mod manifest;

pub use analyze::{LintReport, run_analyzer};
pub use build::{BuildStatus, build_artifact};
pub use manifest::AppVersion;
