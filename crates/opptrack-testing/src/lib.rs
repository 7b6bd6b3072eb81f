//! Testing infrastructure for opptrack integration tests.
//!
//! - `TestWorld`: isolated data directory and CLI runner
//! - `assertions`: checks over the CLI's JSON output
//! - `fixtures`: files to upload as attachments

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use world::{CliResult, TestWorld};
