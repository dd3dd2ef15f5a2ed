//! Poetry adapter for task-runner sessions.
//!
//! This crate lets a session-based task runner call `poetry export` and
//! `poetry build` and get structured results back: the exported requirements
//! text, or the file name of the archive that was built.
//!
//! # Modules
//!
//! - [`config`]: reads `[tool.poetry]` from `pyproject.toml`
//! - [`version`]: installed-version parsing and the dependency-group threshold
//! - [`metadata`]: installed-package version lookups
//! - [`session`]: the execution context commands run through
//! - [`poetry`]: the command adapter

pub mod config;
pub mod error;
pub mod format;
pub mod metadata;
pub mod poetry;
pub mod session;
pub mod version;

pub use config::Config;
pub use error::{Error, Result};
pub use format::DistributionFormat;
pub use metadata::{DistInfoMetadata, InterpreterMetadata, PackageMetadata};
pub use poetry::Poetry;
pub use session::{ProcessSession, RunOptions, Session, StderrMode};
