// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::pipeline::Pipeline;
use crate::server::livereload::LiveReload;
use crate::watch::bindings::{ReloadAction, WatchBinding};

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive; dropping this handle
/// ends the watch session.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn the filesystem watcher over the source root and one worker per
/// binding.
///
/// Events on different bindings run independently of each other; events for
/// one binding are processed strictly in order by its worker, so a binding's
/// task sequence never overlaps itself. A failing step logs the error and
/// skips the reload signal; the session stays alive.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    bindings: Vec<WatchBinding>,
    pipeline: Pipeline,
    reload: LiveReload,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    eprintln!("siteflow: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("siteflow: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;
    info!("file watcher started on {:?}", root);

    // One serializing worker per binding.
    let mut workers = Vec::with_capacity(bindings.len());
    for binding in bindings {
        let tx = spawn_binding_worker(binding.clone(), pipeline.clone(), reload.clone());
        workers.push((binding, tx));
    }

    // Fan-out loop: relativize changed paths and hand them to every
    // matching binding. `try_send` keeps slow bindings from blocking the
    // others; a full queue just drops the event, since the worker will
    // rebuild from current file state anyway.
    let async_root = root.clone();
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if !matches!(
                event.kind,
                EventKind::Create(..) | EventKind::Modify(..) | EventKind::Remove(..)
            ) {
                continue;
            }
            debug!("received notify event: {:?}", event);

            for path in &event.paths {
                let Some(rel) = relative_str(&async_root, path) else {
                    warn!(
                        "could not relativize path {:?} against root {:?}",
                        path, async_root
                    );
                    continue;
                };

                for (binding, tx) in &workers {
                    if binding.matches(&rel) {
                        debug!(binding = binding.name, path = %rel, "watch match");
                        if tx.try_send(rel.clone()).is_err() {
                            debug!(binding = binding.name, "binding busy; event dropped");
                        }
                    }
                }
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Spawn the serializing worker for one binding and return its event
/// queue. Queued events run strictly one at a time; a failing step logs
/// the error and skips the reload signal, and the worker keeps accepting
/// further events.
pub fn spawn_binding_worker(
    binding: WatchBinding,
    pipeline: Pipeline,
    reload: LiveReload,
) -> mpsc::Sender<String> {
    let (tx, mut rx) = mpsc::channel::<String>(32);
    tokio::spawn(async move {
        while let Some(path) = rx.recv().await {
            info!(binding = binding.name, path = %path, "change detected");

            let mut ok = true;
            for s in &binding.steps {
                if let Err(err) = pipeline.run_step(*s).await {
                    error!(
                        binding = binding.name,
                        step = s.name(),
                        "step failed: {err:#}"
                    );
                    ok = false;
                    break;
                }
            }

            if ok {
                match binding.action {
                    ReloadAction::Full => reload.reload(),
                    ReloadAction::Styles => reload.stream(),
                }
            }
        }

        debug!(binding = binding.name, "binding worker ended");
    });
    tx
}

/// Convert a path into a string relative to `root`, with forward slashes.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}
