// src/config/mod.rs

//! Configuration loading and validation for siteflow.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, falling back to defaults (`loader.rs`).
//! - Validate paths, globs and tool commands (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, PathsSection, ServerSection, ToolsSection};
pub use validate::validate_config;
