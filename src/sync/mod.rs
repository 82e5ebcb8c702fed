//! Sync module for offline-first clients
//!
//! Provides:
//! - Batch application of CREATE / UPDATE / DELETE operations
//! - Per-operation outcomes with conflict payloads
//!
//! # Sync Protocol
//!
//! 1. Client queues operations while offline, each carrying the task version
//!    it last saw
//! 2. Client sends the queue as one batch
//! 3. Server applies operations in order; a stale version yields a conflict
//!    result carrying the current server task
//! 4. Client reconciles conflicts and retries, overwrites or discards
//! 5. Client lists tasks with `modifiedSince` set to its last `lastSync`
//!    watermark to pick up changes made elsewhere
//!
//! Conflicts are never resolved on the server.

mod engine;
mod types;

pub use engine::SyncEngine;
pub use types::{BatchResult, OperationKind, OperationResult, SyncOperation, UnknownOperation};
