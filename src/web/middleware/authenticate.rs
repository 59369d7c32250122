//! Session-based authentication extraction.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::{AppError, server_error};
use crate::pipeline::context::set_authenticated;
use crate::state::AppState;
use crate::web::session::{AUTH_USER_KEY, Session};

/// Marks the request authenticated when the session names a user that still
/// exists.
///
/// A session pointing at a deleted user is treated as anonymous. A failed
/// lookup is answered with a 500 and the next stage never runs.
///
/// Must run after [`crate::web::session::load_and_save`].
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(session) = req.extensions().get::<Session>().cloned() else {
        return AppError::defect("authenticate installed without the session middleware")
            .into_response();
    };

    let Some(user_id) = session.get_i64(AUTH_USER_KEY) else {
        return next.run(req).await;
    };

    match state.users.exists(user_id).await {
        Ok(exists) => {
            if !exists {
                tracing::debug!(user_id, "session refers to a missing user");
            }
            set_authenticated(&mut req, exists);
            next.run(req).await
        }
        Err(e) => server_error(&e),
    }
}
