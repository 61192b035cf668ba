//! Application state
//!
//! Shared, immutable wiring for all handlers. Per-user mutable state
//! lives behind the orchestrator's session store, not here.

use std::sync::Arc;

use telassist_agent::SessionOrchestrator;
use telassist_catalog::ProcedureCatalog;
use telassist_config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub catalog: Arc<ProcedureCatalog>,
    pub orchestrator: Arc<SessionOrchestrator>,
}

impl AppState {
    pub fn new(
        settings: Arc<Settings>,
        catalog: Arc<ProcedureCatalog>,
        orchestrator: Arc<SessionOrchestrator>,
    ) -> Self {
        Self {
            settings,
            catalog,
            orchestrator,
        }
    }
}
