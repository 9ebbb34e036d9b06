//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;
use prism_conflict::ConflictSession;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Conflict engine entry points, shared without locks.
    pub session: Arc<ConflictSession>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(session: ConflictSession) -> Self {
        Self {
            session: Arc::new(session),
            start_time: Instant::now(),
        }
    }
}

impl FromRef<AppState> for Arc<ConflictSession> {
    fn from_ref(state: &AppState) -> Self {
        state.session.clone()
    }
}

impl FromRef<AppState> for Instant {
    fn from_ref(state: &AppState) -> Self {
        state.start_time
    }
}
