use std::sync::Arc;

use axum::extract::FromRef;

use crate::domain::repositories::{SnippetRepository, UserRepository};
use crate::web::middleware::csrf::CsrfConfig;
use crate::web::session::SessionManager;

/// Dependencies shared by every request, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub snippets: Arc<dyn SnippetRepository>,
    pub users: Arc<dyn UserRepository>,
    pub sessions: SessionManager,
    pub csrf: CsrfConfig,
}

impl AppState {
    pub fn new(
        snippets: Arc<dyn SnippetRepository>,
        users: Arc<dyn UserRepository>,
        sessions: SessionManager,
        csrf: CsrfConfig,
    ) -> Self {
        Self {
            snippets,
            users,
            sessions,
            csrf,
        }
    }
}

impl FromRef<AppState> for SessionManager {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for CsrfConfig {
    fn from_ref(state: &AppState) -> Self {
        state.csrf
    }
}
