// src/watch/bindings.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::PathsSection;
use crate::pipeline::Step;

/// What to signal to connected browser clients once a binding's task
/// sequence has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadAction {
    /// Full page reload.
    Full,
    /// In-place style-sheet refresh, no page reload.
    Styles,
}

/// One entry of the watch table: a glob set over source paths, the ordered
/// leaf tasks to run when a matching file changes, and the reload action to
/// fire afterwards.
///
/// Bindings are created once when the watch session starts and never
/// mutated. Paths passed to [`matches`](Self::matches) are relative to the
/// project root, with forward slashes.
#[derive(Clone)]
pub struct WatchBinding {
    pub name: &'static str,
    globs: GlobSet,
    pub steps: Vec<Step>,
    pub action: ReloadAction,
}

impl fmt::Debug for WatchBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchBinding")
            .field("name", &self.name)
            .field("steps", &self.steps)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

impl WatchBinding {
    pub fn matches(&self, rel_path: &str) -> bool {
        self.globs.is_match(rel_path)
    }
}

/// Build the fixed binding table for the configured source root:
///
/// - server configuration files → update-configuration → full reload
/// - markup → compile-markup → full reload
/// - style sheets → compile-styles → style stream (no page reload)
/// - scripts → compile-scripts → full reload
/// - assets → clean-assets, recompress → full reload
pub fn build_bindings(paths: &PathsSection) -> Result<Vec<WatchBinding>> {
    let src = &paths.src;

    let table: [(&'static str, Vec<String>, Vec<Step>, ReloadAction); 5] = [
        (
            "configuration",
            vec![
                format!("{src}**/.htaccess"),
                format!("{src}**/*.htaccess"),
                format!("{src}**/*.txt"),
            ],
            vec![Step::UpdateConfiguration],
            ReloadAction::Full,
        ),
        (
            "markup",
            vec![format!("{src}**/*.html")],
            vec![Step::CompileMarkup],
            ReloadAction::Full,
        ),
        (
            "styles",
            vec![format!("{src}stylesheets/**/*.scss")],
            vec![Step::CompileStyles],
            ReloadAction::Styles,
        ),
        (
            "scripts",
            vec![format!("{src}scripts/**")],
            vec![Step::CompileScripts],
            ReloadAction::Full,
        ),
        (
            "assets",
            vec![format!("{src}assets/**")],
            vec![Step::CleanAssets, Step::CompressAssets],
            ReloadAction::Full,
        ),
    ];

    let mut bindings = Vec::with_capacity(table.len());
    for (name, patterns, steps, action) in table {
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = Glob::new(pattern)
                .with_context(|| format!("invalid watch glob for {name}: {pattern}"))?;
            builder.add(glob);
        }
        bindings.push(WatchBinding {
            name,
            globs: builder.build()?,
            steps,
            action,
        });
    }

    Ok(bindings)
}
