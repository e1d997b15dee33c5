// src/watch/mod.rs

//! File watching and rebuild triggering.
//!
//! This module is responsible for:
//! - The fixed binding table mapping source globs to task sequences and a
//!   reload action (`bindings.rs`).
//! - Wiring up the cross-platform filesystem watcher (`notify`) and the
//!   per-binding worker loops (`watcher.rs`).
//!
//! It does not perform any build work itself; it only turns filesystem
//! change events into leaf-task runs followed by a live-reload signal.

pub mod bindings;
pub mod watcher;

pub use bindings::{build_bindings, ReloadAction, WatchBinding};
pub use watcher::{spawn_binding_worker, spawn_watcher, WatcherHandle};
