//! Snippet pages.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use validator::Validate;

use crate::domain::entities::NewSnippet;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::forms::{FieldErrors, PostForm, SnippetCreateForm};
use crate::web::session::FLASH_KEY;
use crate::web::templates::{CreatePage, HomePage, PageContext, ViewPage, render};

/// Lists the latest unexpired snippets.
///
/// # Endpoint
///
/// `GET /`
pub async fn home(State(state): State<AppState>, page: PageContext) -> Result<Response, AppError> {
    let snippets = state.snippets.latest().await?;

    Ok(render(
        StatusCode::OK,
        &HomePage {
            data: page.template_data(),
            snippets,
        },
    ))
}

/// Shows one snippet.
///
/// # Endpoint
///
/// `GET /snippet/view/{id}`
///
/// # Errors
///
/// `404 Not Found` if `id` is not a positive integer, or the snippet is
/// missing or expired.
pub async fn snippet_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
    page: PageContext,
) -> Result<Response, AppError> {
    let id = id
        .parse::<i64>()
        .ok()
        .filter(|id| *id >= 1)
        .ok_or(AppError::NotFound)?;

    let snippet = state.snippets.get(id).await?;

    Ok(render(
        StatusCode::OK,
        &ViewPage {
            data: page.template_data(),
            snippet,
        },
    ))
}

/// Shows the empty create form.
///
/// # Endpoint
///
/// `GET /snippet/create`
pub async fn snippet_create(page: PageContext) -> Response {
    render(
        StatusCode::OK,
        &CreatePage {
            data: page.template_data(),
            form: SnippetCreateForm::default(),
            errors: FieldErrors::default(),
        },
    )
}

/// Validates and stores a new snippet.
///
/// # Endpoint
///
/// `POST /snippet/create`
///
/// # Responses
///
/// - `303 See Other` to the new snippet, with a flash message
/// - `422 Unprocessable Entity` with the form and its field errors
pub async fn snippet_create_post(
    State(state): State<AppState>,
    page: PageContext,
    PostForm(form): PostForm<SnippetCreateForm>,
) -> Result<Response, AppError> {
    if let Err(errors) = form.validate() {
        return Ok(render(
            StatusCode::UNPROCESSABLE_ENTITY,
            &CreatePage {
                data: page.template_data(),
                errors: FieldErrors::from(&errors),
                form,
            },
        ));
    }

    let id = state
        .snippets
        .insert(NewSnippet {
            title: form.title,
            content: form.content,
            expires_days: form.expires,
        })
        .await?;

    tracing::info!(snippet_id = id, "snippet created");
    page.session().put(FLASH_KEY, "Snippet successfully created!");

    Ok(Redirect::to(&format!("/snippet/view/{id}")).into_response())
}
