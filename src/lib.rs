// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fsops;
pub mod logging;
pub mod pipeline;
pub mod server;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::cli::{CliArgs, TaskName};
use crate::config::loader::load_and_validate;
use crate::config::ConfigFile;
use crate::logging::{status_success, status_warn};
use crate::pipeline::{BuildConfig, Pipeline};
use crate::server::livereload::{start_livereload, LiveReload};
use crate::watch::{build_bindings, spawn_watcher, WatcherHandle};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the task graph (with the build profile fixed up front)
/// - the watcher + live-reload channel for the watch/serve tasks
/// - Ctrl-C handling for the blocking tasks
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = Arc::new(load_and_validate(Path::new(&args.config))?);

    // The build profile is immutable for the whole process; `build` and
    // `package` are the only production entry points.
    let build = BuildConfig {
        production: args.task.is_production(),
    };
    let pipeline = Pipeline::new(cfg.clone(), build);

    if args.dry_run {
        print_dry_run(&pipeline, args.task)?;
        return Ok(());
    }

    match args.task {
        TaskName::CompileStyles => pipeline.compile_styles().await,
        TaskName::CompileScripts => pipeline.compile_scripts().await,
        TaskName::CompileMarkup => pipeline.compile_markup().await,
        TaskName::UpdateConfiguration => pipeline.update_configuration().await,
        TaskName::CompressAssets => pipeline.compress_assets().await,
        TaskName::LintStyles => pipeline.lint_styles().await,
        TaskName::LintScripts => pipeline.lint_scripts().await,
        TaskName::LintMarkup => pipeline.lint_markup().await,
        TaskName::Lint => pipeline.lint().await,
        TaskName::Clean => pipeline.clean().await,
        TaskName::CleanBuild => pipeline.clean_build().await,
        TaskName::CleanAssets => pipeline.clean_assets().await,
        TaskName::Compile | TaskName::Build => pipeline.compile().await,
        TaskName::Compress => pipeline.compress().await,
        TaskName::Package => pipeline.package().await,
        TaskName::Server => run_server(&pipeline, &cfg).await,
        TaskName::Watch => run_watch(pipeline, &cfg).await,
        TaskName::Start => run_start(pipeline, &cfg).await,
    }
}

async fn run_server(pipeline: &Pipeline, cfg: &ConfigFile) -> Result<()> {
    let (_reload, _ws_port) = start_livereload(cfg.server.reload_port)?;
    status_success("Starting the development server...");

    let dist = PathBuf::from(&pipeline.paths().dist);
    tokio::select! {
        res = server::serve(dist, cfg.server.port) => res,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested");
            Ok(())
        }
    }
}

async fn run_watch(pipeline: Pipeline, cfg: &ConfigFile) -> Result<()> {
    let (reload, _ws_port) = start_livereload(cfg.server.reload_port)?;
    let _handle = start_watch_session(&pipeline, reload)?;

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    Ok(())
}

/// `start`: dev server, watch session and an initial compile in one
/// parallel group. The server and watcher block until shutdown; a failing
/// initial compile fails the whole task.
async fn run_start(pipeline: Pipeline, cfg: &ConfigFile) -> Result<()> {
    let (reload, _ws_port) = start_livereload(cfg.server.reload_port)?;
    let _handle = start_watch_session(&pipeline, reload)?;
    status_success("Starting the development server...");

    let dist = PathBuf::from(&pipeline.paths().dist);
    tokio::select! {
        res = server::serve(dist, cfg.server.port) => res,
        res = async {
            pipeline.compile().await?;
            tokio::signal::ctrl_c().await?;
            info!("shutdown requested");
            Ok(())
        } => res,
    }
}

/// Register the watch bindings and start the watcher over the project
/// root. The returned handle keeps the session alive.
fn start_watch_session(
    pipeline: &Pipeline,
    reload: LiveReload,
) -> Result<WatcherHandle> {
    let bindings = build_bindings(pipeline.paths())?;
    let handle = spawn_watcher(
        std::env::current_dir()?,
        bindings,
        pipeline.clone(),
        reload,
    )?;

    if !pipeline.build_config().production {
        status_warn("Note that the development build is not optimised");
    }
    status_success("Watching changes...");
    Ok(handle)
}

/// Dry-run output: the task's composition, the rendered collaborator
/// commands, and the watch table where relevant.
fn print_dry_run(pipeline: &Pipeline, task: TaskName) -> Result<()> {
    println!("siteflow dry-run");
    println!("  task: {task:?}");
    println!("  production: {}", pipeline.build_config().production);
    println!();

    println!("composition:");
    for line in describe(task) {
        println!("  {line}");
    }
    println!();

    println!("tools:");
    for (name, cmd) in pipeline.rendered_tools() {
        println!("  {name}: {cmd}");
    }

    if matches!(task, TaskName::Watch | TaskName::Start) {
        println!();
        println!("watch bindings:");
        for binding in build_bindings(pipeline.paths())? {
            let steps: Vec<&str> = binding.steps.iter().map(|s| s.name()).collect();
            println!(
                "  {} -> {} -> {:?}",
                binding.name,
                steps.join(", "),
                binding.action
            );
        }
    }

    Ok(())
}

fn describe(task: TaskName) -> Vec<String> {
    match task {
        TaskName::Lint => vec![
            "parallel { lint-styles, lint-scripts, lint-markup }".into(),
            "then: success message".into(),
        ],
        TaskName::Compile | TaskName::Build => vec![
            "sequence {".into(),
            "  clean".into(),
            "  parallel { update-configuration, compile-markup, compile-styles, \
             compile-scripts, compress-assets }"
                .into(),
            "  done message (production only)".into(),
            "}".into(),
        ],
        TaskName::Compress => vec![
            "parallel { copy dist -> build, archive dist -> zip }".into(),
        ],
        TaskName::Package => vec![
            "sequence {".into(),
            "  clean-build".into(),
            "  build (production compile)".into(),
            "  compress (continues to lint on failure)".into(),
            "  lint".into(),
            "}".into(),
        ],
        TaskName::Watch => vec!["watch session over the binding table below".into()],
        TaskName::Start => {
            vec!["parallel { server, watch, compile }".into()]
        }
        TaskName::Server => vec!["live-reload channel + static file server".into()],
        other => vec![format!("leaf task {other:?}")],
    }
}
