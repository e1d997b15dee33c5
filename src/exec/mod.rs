// src/exec/mod.rs

//! External collaborator execution.
//!
//! Every non-trivial transformation (style compilation, bundling, linting,
//! image compression) is an opaque command configured in `[tools]`. This
//! module renders the command template and runs it through a shell using
//! `tokio::process::Command`, mapping the exit status onto the two error
//! classes of the pipeline (fatal vs reported findings).

pub mod command;

pub use command::{render_command, run_tool, StepClass};
