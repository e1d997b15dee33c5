// src/pipeline/tasks.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::error;

use crate::config::{ConfigFile, PathsSection};
use crate::exec::{render_command, run_tool, StepClass};
use crate::fsops;
use crate::logging::{status_info, status_success};
use crate::pipeline::combine::{parallel, sequence, step};

/// Immutable build configuration, decided before the task graph is
/// constructed and threaded into every task. Replaces the mutable
/// process-wide production flag of the original project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildConfig {
    pub production: bool,
}

/// Typed handles for the leaf tasks a watch binding can trigger.
///
/// Referencing a task that does not exist is a compile error rather than a
/// run-time string-lookup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    UpdateConfiguration,
    CompileMarkup,
    CompileStyles,
    CompileScripts,
    CleanAssets,
    CompressAssets,
}

impl Step {
    pub fn name(self) -> &'static str {
        match self {
            Step::UpdateConfiguration => "update-configuration",
            Step::CompileMarkup => "compile-markup",
            Step::CompileStyles => "compile-styles",
            Step::CompileScripts => "compile-scripts",
            Step::CleanAssets => "clean-assets",
            Step::CompressAssets => "compress-assets",
        }
    }
}

/// The task graph. Holds the immutable configuration; every task is a
/// method, and aggregates compose leaves through the combinators in
/// [`crate::pipeline::combine`].
#[derive(Clone)]
pub struct Pipeline {
    cfg: Arc<ConfigFile>,
    build: BuildConfig,
}

impl Pipeline {
    pub fn new(cfg: Arc<ConfigFile>, build: BuildConfig) -> Self {
        Self { cfg, build }
    }

    pub fn build_config(&self) -> BuildConfig {
        self.build
    }

    pub fn paths(&self) -> &PathsSection {
        &self.cfg.paths
    }

    /// Every collaborator command with its placeholders rendered, for
    /// dry-run output.
    pub fn rendered_tools(&self) -> Vec<(&'static str, String)> {
        let tools = &self.cfg.tools;
        [
            ("styles", &tools.styles),
            ("styles_lint", &tools.styles_lint),
            ("scripts", &tools.scripts),
            ("scripts_lint", &tools.scripts_lint),
            ("markup_lint", &tools.markup_lint),
            ("assets", &tools.assets),
        ]
        .into_iter()
        .map(|(name, tpl)| (name, render_command(tpl, &self.cfg.paths, self.build)))
        .collect()
    }

    fn src_dir(&self) -> PathBuf {
        PathBuf::from(&self.cfg.paths.src)
    }

    fn dist_dir(&self) -> PathBuf {
        PathBuf::from(&self.cfg.paths.dist)
    }

    fn build_dir(&self) -> PathBuf {
        PathBuf::from(&self.cfg.paths.build)
    }

    async fn tool(&self, name: &'static str, template: &str, class: StepClass) -> Result<()> {
        let shell = render_command(template, &self.cfg.paths, self.build);
        run_tool(name, &shell, class).await
    }

    /// Dispatch a typed step handle; used by the watch binding workers.
    pub async fn run_step(&self, s: Step) -> Result<()> {
        match s {
            Step::UpdateConfiguration => self.update_configuration().await,
            Step::CompileMarkup => self.compile_markup().await,
            Step::CompileStyles => self.compile_styles().await,
            Step::CompileScripts => self.compile_scripts().await,
            Step::CleanAssets => self.clean_assets().await,
            Step::CompressAssets => self.compress_assets().await,
        }
    }

    // ---- leaf tasks -----------------------------------------------------

    /// Lint, then compile the style sheets into the distributable.
    pub async fn compile_styles(&self) -> Result<()> {
        status_info("Styles compiled");
        self.tool("styles_lint", &self.cfg.tools.styles_lint, StepClass::Advisory)
            .await?;
        self.tool("styles", &self.cfg.tools.styles, StepClass::Fatal)
            .await
    }

    /// Lint, then bundle the scripts. The bundler profile follows the build
    /// configuration, so `build` selects production optimisation.
    pub async fn compile_scripts(&self) -> Result<()> {
        status_info("Scripts compiled");
        self.tool(
            "scripts_lint",
            &self.cfg.tools.scripts_lint,
            StepClass::Advisory,
        )
        .await?;
        self.tool("scripts", &self.cfg.tools.scripts, StepClass::Fatal)
            .await
    }

    /// Lint the markup and copy it through to the distributable.
    pub async fn compile_markup(&self) -> Result<()> {
        status_info("Markup compiled");
        self.tool(
            "markup_lint",
            &self.cfg.tools.markup_lint,
            StepClass::Advisory,
        )
        .await?;
        let set = fsops::build_globset(&["**/*.html".to_string()])?;
        fsops::copy_matching(&self.src_dir(), &set, &self.dist_dir())?;
        Ok(())
    }

    /// Copy server configuration files (`.htaccess`, `*.txt`) into the
    /// distributable, dotfiles included.
    pub async fn update_configuration(&self) -> Result<()> {
        status_info("Configuration updated");
        let set = fsops::build_globset(&[
            "**/*.txt".to_string(),
            "**/.htaccess".to_string(),
            "**/*.htaccess".to_string(),
        ])?;
        fsops::copy_matching(&self.src_dir(), &set, &self.dist_dir())?;
        Ok(())
    }

    /// Run the image compressor over the asset directory.
    pub async fn compress_assets(&self) -> Result<()> {
        status_info("Assets optimised");
        self.tool("assets", &self.cfg.tools.assets, StepClass::Fatal)
            .await
    }

    pub async fn lint_styles(&self) -> Result<()> {
        self.tool("styles_lint", &self.cfg.tools.styles_lint, StepClass::Advisory)
            .await
    }

    pub async fn lint_scripts(&self) -> Result<()> {
        self.tool(
            "scripts_lint",
            &self.cfg.tools.scripts_lint,
            StepClass::Advisory,
        )
        .await
    }

    pub async fn lint_markup(&self) -> Result<()> {
        self.tool(
            "markup_lint",
            &self.cfg.tools.markup_lint,
            StepClass::Advisory,
        )
        .await
    }

    /// Force-delete the distributable directory.
    pub async fn clean(&self) -> Result<()> {
        status_success("Distributable directory cleaned");
        fsops::clean_dir(&self.dist_dir())
    }

    /// Force-delete the build output directory.
    pub async fn clean_build(&self) -> Result<()> {
        status_success("Build directory cleaned");
        fsops::clean_dir(&self.build_dir())
    }

    /// Force-delete compiled assets only, ahead of recompression.
    pub async fn clean_assets(&self) -> Result<()> {
        fsops::clean_dir(&self.dist_dir().join("assets"))
    }

    // ---- aggregate tasks ------------------------------------------------

    /// Run all three linters concurrently. Findings never fail this task.
    pub async fn lint(&self) -> Result<()> {
        let group = vec![
            step({
                let p = self.clone();
                async move { p.lint_styles().await }
            }),
            step({
                let p = self.clone();
                async move { p.lint_scripts().await }
            }),
            step({
                let p = self.clone();
                async move { p.lint_markup().await }
            }),
        ];
        parallel(group).await?;
        status_success("Linted");
        Ok(())
    }

    /// Clean, then produce the whole distributable in one parallel group.
    pub async fn compile(&self) -> Result<()> {
        let group = vec![
            step({
                let p = self.clone();
                async move { p.update_configuration().await }
            }),
            step({
                let p = self.clone();
                async move { p.compile_markup().await }
            }),
            step({
                let p = self.clone();
                async move { p.compile_styles().await }
            }),
            step({
                let p = self.clone();
                async move { p.compile_scripts().await }
            }),
            step({
                let p = self.clone();
                async move { p.compress_assets().await }
            }),
        ];

        sequence(vec![
            step({
                let p = self.clone();
                async move { p.clean().await }
            }),
            step(async move { parallel(group).await }),
        ])
        .await?;

        if self.build.production {
            status_success("Production version built");
        }
        Ok(())
    }

    /// Copy the distributable into the build directory and archive it at
    /// the repository root. Both outputs are produced from independent
    /// passes over the same selection; compress completes only after both
    /// have finished.
    pub async fn compress(&self) -> Result<()> {
        status_success("Production build packaged");

        let set = fsops::build_globset(&self.cfg.paths.package)?;
        let dist = self.dist_dir();
        let build = self.build_dir();
        let archive = PathBuf::from(&self.cfg.paths.archive);

        let copy = {
            let set = set.clone();
            let dist = dist.clone();
            tokio::task::spawn_blocking(move || -> Result<()> {
                std::fs::create_dir_all(&build)?;
                fsops::copy_matching(&dist, &set, &build)?;
                Ok(())
            })
        };
        let zip = tokio::task::spawn_blocking(move || -> Result<()> {
            fsops::zip_matching(&dist, &set, &archive)?;
            Ok(())
        });

        let (copied, zipped) = tokio::try_join!(copy, zip)?;
        copied?;
        zipped?;
        Ok(())
    }

    /// The full packaging pipeline: clean the build directory, build for
    /// production, compress, lint. A compress failure is reported and still
    /// lets lint run, but fails the task afterwards.
    pub async fn package(&self) -> Result<()> {
        self.clean_build().await?;
        self.compile().await?;

        let compress_result = self.compress().await;
        if let Err(err) = &compress_result {
            error!("packaging failed: {err:#}");
        }

        self.lint().await?;
        compress_result
    }
}
