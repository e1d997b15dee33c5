// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `siteflow`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "siteflow",
    version,
    about = "Build, watch and package a static-site front-end project.",
    long_about = None
)]
pub struct CliArgs {
    /// The task to run.
    #[arg(value_enum, value_name = "TASK")]
    pub task: TaskName,

    /// Path to the config file (TOML).
    ///
    /// Defaults are used for every missing section, so the file itself is
    /// optional.
    #[arg(long, value_name = "PATH", default_value = "Siteflow.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SITEFLOW_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the resolved pipeline for the task without executing anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Every invokable task. The camelCase aliases match the task names used by
/// the original project's task runner.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TaskName {
    #[value(alias = "compileStyles")]
    CompileStyles,
    #[value(alias = "compileScripts")]
    CompileScripts,
    #[value(alias = "compileMarkup")]
    CompileMarkup,
    #[value(alias = "updateConfiguration")]
    UpdateConfiguration,
    #[value(alias = "compressAssets")]
    CompressAssets,
    #[value(alias = "lintStyles")]
    LintStyles,
    #[value(alias = "lintScripts")]
    LintScripts,
    #[value(alias = "lintMarkup")]
    LintMarkup,
    Lint,
    Clean,
    #[value(alias = "cleanBuild")]
    CleanBuild,
    #[value(alias = "cleanAssets")]
    CleanAssets,
    Server,
    Compile,
    Build,
    Compress,
    Package,
    Watch,
    Start,
}

impl TaskName {
    /// Tasks that build for release select the production bundler profile.
    pub fn is_production(self) -> bool {
        matches!(self, TaskName::Build | TaskName::Package)
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
