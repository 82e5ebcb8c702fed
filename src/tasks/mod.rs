//! Task module
//!
//! Provides:
//! - The task model and its create/patch inputs
//! - The in-memory store with optimistic concurrency control
//! - Per-user stats and the incremental-sync watermark
//! - A validating service used by the HTTP routes
//!
//! # Versioning
//!
//! Every task starts at version 1. Each accepted update bumps the version by
//! exactly one. Update and delete accept an expected version; when it does
//! not match the stored one the write is refused and the stored task is
//! returned so the client can decide whether to retry, overwrite or discard.

mod service;
mod stats;
mod store;
mod types;

pub use service::TaskService;
pub use stats::TaskStats;
pub use store::{StorePolicy, TaskStore};
pub use types::{now_millis, NewTask, Priority, Task, TaskPatch, DEFAULT_USER_ID};
