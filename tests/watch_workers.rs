#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use siteflow::config::{ConfigFile, PathsSection, ToolsSection};
use siteflow::pipeline::{BuildConfig, Pipeline, Step};
use siteflow::server::livereload::{LiveReload, Signal};
use siteflow::watch::{build_bindings, spawn_binding_worker, WatchBinding};
use tempfile::{tempdir, TempDir};

type TestResult = Result<(), Box<dyn Error>>;

fn fixture(dir: &TempDir) -> ConfigFile {
    let root = dir.path().to_string_lossy().to_string();
    ConfigFile {
        paths: PathsSection {
            src: format!("{root}/src/"),
            dist: format!("{root}/dist/"),
            build: format!("{root}/build/"),
            archive: format!("{root}/build.zip"),
            ..PathsSection::default()
        },
        tools: ToolsSection {
            styles: "true".to_string(),
            styles_lint: "true".to_string(),
            scripts: "true".to_string(),
            scripts_lint: "true".to_string(),
            markup_lint: "true".to_string(),
            assets: "true".to_string(),
        },
        server: Default::default(),
    }
}

fn scripts_binding(cfg: &ConfigFile) -> Result<WatchBinding, Box<dyn Error>> {
    build_bindings(&cfg.paths)?
        .into_iter()
        .find(|b| b.steps == vec![Step::CompileScripts])
        .ok_or_else(|| "no scripts binding in the table".into())
}

fn runs(log: &Path) -> usize {
    fs::read_to_string(log)
        .map(|s| s.lines().count())
        .unwrap_or(0)
}

async fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    false
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn a_failing_step_skips_the_reload_and_keeps_the_worker_alive() -> TestResult {
    let dir = tempdir()?;
    let log = dir.path().join("runs.log");
    let mut cfg = fixture(&dir);
    cfg.tools.scripts = format!("echo ran >> {} && exit 1", log.display());

    let binding = scripts_binding(&cfg)?;
    let pipeline = Pipeline::new(Arc::new(cfg), BuildConfig::default());
    let (reload, signals) = LiveReload::channel();
    let queue = spawn_binding_worker(binding, pipeline, reload);

    queue.send("src/scripts/entry.js".to_string()).await?;
    assert!(wait_until(|| runs(&log) == 1).await, "first event not processed");
    assert!(signals.try_recv().is_err(), "reload fired for a failed step");

    // A failure must not end the worker: later events still run.
    queue.send("src/scripts/entry.js".to_string()).await?;
    assert!(wait_until(|| runs(&log) == 2).await, "worker stopped after failure");
    assert!(signals.try_recv().is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn queued_events_for_one_binding_run_strictly_in_order() -> TestResult {
    let dir = tempdir()?;
    let log = dir.path().join("runs.log");
    let mut cfg = fixture(&dir);
    cfg.tools.scripts = format!(
        "echo start >> {log}; sleep 0.3; echo end >> {log}",
        log = log.display()
    );

    let binding = scripts_binding(&cfg)?;
    let pipeline = Pipeline::new(Arc::new(cfg), BuildConfig::default());
    let (reload, signals) = LiveReload::channel();
    let queue = spawn_binding_worker(binding, pipeline, reload);

    queue.send("src/scripts/a.js".to_string()).await?;
    queue.send("src/scripts/b.js".to_string()).await?;

    assert_eq!(signals.recv_timeout(Duration::from_secs(10))?, Signal::Reload);
    assert_eq!(signals.recv_timeout(Duration::from_secs(10))?, Signal::Reload);

    // Interleaved runs would show start,start; the worker serializes them.
    let lines: Vec<String> = fs::read_to_string(&log)?
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(lines, ["start", "end", "start", "end"]);
    Ok(())
}
