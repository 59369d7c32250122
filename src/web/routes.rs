//! Page routes and their per-route chains.

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};

use crate::pipeline::{Chain, Middleware};
use crate::state::AppState;
use crate::web::handlers::{
    account_view, home, snippet_create, snippet_create_post, snippet_view, user_login,
    user_login_post, user_logout_post, user_signup, user_signup_post,
};
use crate::web::middleware::authenticate::authenticate;
use crate::web::middleware::csrf;
use crate::web::middleware::require_auth::require_authentication;
use crate::web::session::load_and_save;

/// Session, CSRF and authentication, in that order.
pub fn dynamic(state: &AppState) -> Chain {
    Chain::new([
        Middleware::from_layer(from_fn_with_state(state.sessions.clone(), load_and_save)),
        Middleware::from_layer(from_fn_with_state(state.csrf, csrf::protect)),
        Middleware::from_layer(from_fn_with_state(state.clone(), authenticate)),
    ])
}

/// The dynamic chain plus the route guard.
pub fn protected(dynamic: &Chain) -> Chain {
    dynamic.append([Middleware::from_layer(from_fn(require_authentication))])
}

/// Page routes, each wrapped in its own chain.
///
/// # Endpoints
///
/// Dynamic:
///
/// - `GET /` - latest snippets
/// - `GET /snippet/view/{id}` - one snippet
/// - `GET|POST /user/signup`
/// - `GET|POST /user/login`
///
/// Protected:
///
/// - `GET|POST /snippet/create`
/// - `GET /account/view`
/// - `POST /user/logout`
pub fn page_routes(state: &AppState) -> Router {
    let dynamic = dynamic(state);
    let protected = protected(&dynamic);

    Router::new()
        .route_service("/", dynamic.then(get(home).with_state(state.clone())))
        .route_service(
            "/snippet/view/{id}",
            dynamic.then(get(snippet_view).with_state(state.clone())),
        )
        .route_service(
            "/user/signup",
            dynamic.then(
                get(user_signup)
                    .post(user_signup_post)
                    .with_state(state.clone()),
            ),
        )
        .route_service(
            "/user/login",
            dynamic.then(
                get(user_login)
                    .post(user_login_post)
                    .with_state(state.clone()),
            ),
        )
        .route_service(
            "/snippet/create",
            protected.then(
                get(snippet_create)
                    .post(snippet_create_post)
                    .with_state(state.clone()),
            ),
        )
        .route_service(
            "/account/view",
            protected.then(get(account_view).with_state(state.clone())),
        )
        .route_service(
            "/user/logout",
            protected.then(post(user_logout_post).with_state(state.clone())),
        )
}
