use crate::sync::SyncOrchestrator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub sync: Arc<SyncOrchestrator>,
}

impl AppState {
    pub fn new(sync: SyncOrchestrator) -> Self {
        Self {
            sync: Arc::new(sync),
        }
    }
}
