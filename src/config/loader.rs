// src/config/loader.rs

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;

/// Load a configuration file from a given path and return the raw
/// `ConfigFile`.
///
/// A missing file is not an error; every section has defaults matching the
/// original project layout, so the file only needs to exist when something
/// is overridden. Use [`load_and_validate`] for the semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();

    if !path.exists() {
        debug!(path = %path.display(), "no config file found; using defaults");
        return Ok(ConfigFile::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {:?}", path))?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
///
/// This is the entry point used by the rest of the application:
///
/// - Reads TOML (or falls back to defaults).
/// - Normalises the path roots (trailing slashes).
/// - Checks that globs compile and tool commands are non-empty.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let mut config = load_from_path(&path)?;
    validate_config(&mut config)?;
    Ok(config)
}
