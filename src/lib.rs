pub mod auth;
pub mod config;
pub mod error;
pub mod llm;
pub mod planner;
pub mod rest;
pub mod storage;

use std::sync::Arc;

use config::DaemonConfig;
use llm::Completion;
use storage::Storage;

/// Shared application state passed to every REST handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<DaemonConfig>,
    pub storage: Arc<Storage>,
    /// Completion backend for plan generation. A trait object so tests can
    /// substitute a scripted backend.
    pub llm: Arc<dyn Completion>,
    pub started_at: std::time::Instant,
}
