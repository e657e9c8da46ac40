//! Core building blocks shared by every command
//!
//! - **config**: ship.toml parsing, defaults and validation
//! - **context**: project root + config, built once in main
//! - **error**: error types with contextual help messages
//! - **process**: launching external tools (analyzer, build tool)

pub mod config;
pub mod context;
pub mod error;
pub mod process;
