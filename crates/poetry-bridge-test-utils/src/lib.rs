//! Shared test utilities for the poetry-bridge workspace.
//!
//! This crate provides fixtures used by the integration suites. It is a
//! dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`project`]: [`TestProject`] temporary project with a `pyproject.toml`
//! - [`session`]: [`ScriptedSession`] that records calls and replays output
//! - [`metadata`]: [`StaticMetadata`] with fixed installed versions
//! - [`buffer`]: [`SharedBuffer`] for capturing diagnostics

pub mod buffer;
pub mod metadata;
pub mod project;
pub mod session;

pub use buffer::SharedBuffer;
pub use metadata::StaticMetadata;
pub use project::TestProject;
pub use session::{Call, ScriptedSession};
