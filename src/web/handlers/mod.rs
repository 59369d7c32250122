//! Page handlers.
//!
//! Handlers read request data through extractors, call a repository and
//! answer through [`crate::web::templates::render`], a redirect, or an
//! [`crate::error::AppError`]. None of them writes error text directly.

mod ping;
mod snippets;
mod users;

pub use ping::ping;
pub use snippets::{home, snippet_create, snippet_create_post, snippet_view};
pub use users::{
    account_view, user_login, user_login_post, user_logout_post, user_signup, user_signup_post,
};
