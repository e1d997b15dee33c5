// src/config/validate.rs

use anyhow::{anyhow, Context, Result};
use globset::Glob;

use crate::config::model::ConfigFile;

/// Run semantic validation against a loaded configuration, normalising the
/// path roots in place.
///
/// This checks:
/// - path roots are non-empty (and gain a trailing slash if missing)
/// - the archive name is non-empty
/// - all package globs compile
/// - every tool command is non-empty
pub fn validate_config(cfg: &mut ConfigFile) -> Result<()> {
    normalise_paths(cfg)?;
    validate_package_globs(cfg)?;
    validate_tools(cfg)?;
    Ok(())
}

/// Path roots are concatenated with glob suffixes all over the pipeline, so
/// enforce the trailing-slash convention here instead of at every use site.
fn normalise_paths(cfg: &mut ConfigFile) -> Result<()> {
    for (name, root) in [
        ("src", &mut cfg.paths.src),
        ("dist", &mut cfg.paths.dist),
        ("build", &mut cfg.paths.build),
    ] {
        if root.trim().is_empty() {
            return Err(anyhow!("[paths].{name} must not be empty"));
        }
        if !root.ends_with('/') {
            root.push('/');
        }
    }

    if cfg.paths.archive.trim().is_empty() {
        return Err(anyhow!("[paths].archive must not be empty"));
    }

    if cfg.paths.package.is_empty() {
        return Err(anyhow!(
            "[paths].package must contain at least one glob pattern"
        ));
    }

    Ok(())
}

fn validate_package_globs(cfg: &ConfigFile) -> Result<()> {
    for pattern in &cfg.paths.package {
        Glob::new(pattern)
            .with_context(|| format!("invalid [paths].package glob: {pattern}"))?;
    }
    Ok(())
}

fn validate_tools(cfg: &ConfigFile) -> Result<()> {
    for (name, cmd) in [
        ("styles", &cfg.tools.styles),
        ("styles_lint", &cfg.tools.styles_lint),
        ("scripts", &cfg.tools.scripts),
        ("scripts_lint", &cfg.tools.scripts_lint),
        ("markup_lint", &cfg.tools.markup_lint),
        ("assets", &cfg.tools.assets),
    ] {
        if cmd.trim().is_empty() {
            return Err(anyhow!("[tools].{name} must not be empty"));
        }
    }
    Ok(())
}
