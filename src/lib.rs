//! Tasksync Server Library
//!
//! Server-side sync backend for offline-first task clients. The server
//! binary is in main.rs.
//!
//! # Modules
//!
//! - `tasks`: Task model, in-memory store with optimistic concurrency, service
//! - `sync`: Batch application of queued client operations
//! - `routes`: HTTP endpoints
//! - `config`, `error`, `state`: Ambient plumbing

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod sync;
pub mod tasks;
