use std::sync::Arc;

use crate::applications::dispatcher::ApplicationDispatcher;
use crate::jobs::catalog::JobCatalog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the platform registry and the outbound Knit gateway.
    pub dispatcher: ApplicationDispatcher,
    pub catalog: Arc<JobCatalog>,
}
