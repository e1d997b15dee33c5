// src/pipeline/mod.rs

//! The task graph.
//!
//! - [`combine`] holds the sequence / parallel composition combinators.
//! - [`tasks`] holds the build configuration, the typed step handles and
//!   the `Pipeline` with every leaf and aggregate task.

pub mod combine;
pub mod tasks;

pub use combine::{parallel, sequence, step, StepFuture};
pub use tasks::{BuildConfig, Pipeline, Step};
