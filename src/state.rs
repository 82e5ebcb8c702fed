//! Application state management

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::sync::SyncEngine;
use crate::tasks::{TaskService, TaskStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    tasks: TaskService,
    sync: SyncEngine,
    started_at: Instant,
}

impl AppState {
    /// Create a new application state with an empty task store
    ///
    /// The task service and the sync engine share the same store.
    pub fn new(config: Config) -> Self {
        let store = TaskStore::with_policy(config.sync);

        Self {
            inner: Arc::new(AppStateInner {
                tasks: TaskService::new(store.clone()),
                sync: SyncEngine::new(store),
                config,
                started_at: Instant::now(),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the task service
    pub fn tasks(&self) -> &TaskService {
        &self.inner.tasks
    }

    /// Get the sync engine
    pub fn sync(&self) -> &SyncEngine {
        &self.inner.sync
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> f64 {
        self.inner.started_at.elapsed().as_secs_f64()
    }
}
