// src/exec/command.rs

use std::process::Stdio;

use anyhow::{anyhow, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::PathsSection;
use crate::pipeline::BuildConfig;

/// How a collaborator's non-zero exit status is classified.
///
/// - `Fatal`: the step failed (malformed input, compiler abort); the error
///   propagates and aborts the enclosing sequence.
/// - `Advisory`: the exit status carries lint findings; they are reported
///   but the step still succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepClass {
    Fatal,
    Advisory,
}

/// Render a `[tools]` command template against the configured paths and the
/// build mode.
///
/// Placeholders: `{src}`, `{dist}`, `{build}`, `{mode}`.
pub fn render_command(template: &str, paths: &PathsSection, build: BuildConfig) -> String {
    let mode = if build.production {
        "production"
    } else {
        "development"
    };

    template
        .replace("{src}", &paths.src)
        .replace("{dist}", &paths.dist)
        .replace("{build}", &paths.build)
        .replace("{mode}", mode)
}

/// Run a rendered collaborator command through the platform shell.
///
/// Output handling depends on the class: advisory tools have their stdout
/// forwarded at info level so lint findings stay visible, fatal tools log at
/// debug. Stderr is always drained so OS pipe buffers never fill up.
pub async fn run_tool(name: &'static str, shell: &str, class: StepClass) -> Result<()> {
    debug!(tool = name, cmd = shell, "starting collaborator process");

    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(shell);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(shell);
        c
    };

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) if class == StepClass::Advisory => {
            // A missing linter must not abort the pipeline; findings are the
            // only advisory failure mode.
            warn!(tool = name, error = %err, "linter could not be started; skipping");
            return Ok(());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("spawning process for tool '{name}'"));
        }
    };

    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                match class {
                    StepClass::Advisory => info!(tool = name, "{line}"),
                    StepClass::Fatal => debug!(tool = name, "{line}"),
                }
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(tool = name, "stderr: {line}");
            }
        });
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of tool '{name}'"))?;

    let code = status.code().unwrap_or(-1);
    debug!(tool = name, exit_code = code, "collaborator process exited");

    if status.success() {
        return Ok(());
    }

    match class {
        StepClass::Advisory => {
            warn!(tool = name, exit_code = code, "findings reported");
            Ok(())
        }
        StepClass::Fatal => Err(anyhow!("tool '{name}' failed with exit code {code}")),
    }
}
