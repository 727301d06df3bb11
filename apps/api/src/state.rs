use std::sync::Arc;

use crate::applications::store::ApplicationStore;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Process-lifetime record store; contents are lost on restart.
    pub store: Arc<ApplicationStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            store: Arc::new(ApplicationStore::new()),
            config,
        }
    }
}
