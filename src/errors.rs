// src/errors.rs

//! Crate-wide error aliases.
//!
//! Currently a thin wrapper around `anyhow`; this module is the single place
//! to introduce structured error types if they become necessary.

pub use anyhow::{Error, Result};
