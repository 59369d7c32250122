//! Page types and the single rendering path.
//!
//! Each page is an askama template compiled into the binary, so a page that
//! does not exist cannot be asked for at runtime. [`render`] renders into a
//! buffer first; a template error never leaves a half-written response.

use askama::Template;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{Html, IntoResponse, Response};
use chrono::{Datelike, Utc};

use crate::domain::entities::{Snippet, User};
use crate::error::{AppError, server_error};
use crate::pipeline::{Authenticated, CsrfToken};
use crate::web::forms::{FieldErrors, SnippetCreateForm, UserLoginForm, UserSignupForm};
use crate::web::session::{FLASH_KEY, Session};

/// Values every page layout needs.
#[derive(Debug, Clone)]
pub struct TemplateData {
    pub current_year: i32,
    pub flash: Option<String>,
    pub is_authenticated: bool,
    pub csrf_token: String,
}

/// Request-scoped inputs for [`TemplateData`], extracted from the values the
/// dynamic chain stored on the request.
#[derive(Debug, Clone)]
pub struct PageContext {
    session: Session,
    authenticated: bool,
    csrf_token: String,
}

impl PageContext {
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Builds the layout data. Takes the pending flash message out of the
    /// session, so call it only for a page that is about to be rendered.
    pub fn template_data(&self) -> TemplateData {
        TemplateData {
            current_year: Utc::now().year(),
            flash: self.session.pop(FLASH_KEY),
            is_authenticated: self.authenticated,
            csrf_token: self.csrf_token.clone(),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for PageContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        let csrf_token = CsrfToken::from_extensions(&parts.extensions)
            .ok_or_else(|| AppError::defect("CSRF middleware is not installed on this route"))?;

        Ok(Self {
            session,
            authenticated: Authenticated::from_extensions(&parts.extensions).0,
            csrf_token: csrf_token.as_str().to_string(),
        })
    }
}

/// Renders `page` and answers with `status`, or with a 500 if rendering fails.
pub fn render<T: Template>(status: StatusCode, page: &T) -> Response {
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => server_error(&e),
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub data: TemplateData,
    pub snippets: Vec<Snippet>,
}

#[derive(Template)]
#[template(path = "view.html")]
pub struct ViewPage {
    pub data: TemplateData,
    pub snippet: Snippet,
}

#[derive(Template)]
#[template(path = "create.html")]
pub struct CreatePage {
    pub data: TemplateData,
    pub form: SnippetCreateForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupPage {
    pub data: TemplateData,
    pub form: UserSignupForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub data: TemplateData,
    pub form: UserLoginForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "account.html")]
pub struct AccountPage {
    pub data: TemplateData,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use chrono::{Duration, TimeZone};

    fn data() -> TemplateData {
        TemplateData {
            current_year: 2024,
            flash: Some("Snippet successfully created!".to_string()),
            is_authenticated: true,
            csrf_token: "tok".to_string(),
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_render_writes_status_and_layout() {
        let created = Utc.with_ymd_and_hms(2024, 3, 17, 10, 15, 0).unwrap();
        let page = ViewPage {
            data: data(),
            snippet: Snippet {
                id: 7,
                title: "<b>Title</b>".to_string(),
                content: "Body".to_string(),
                created,
                expires: created + Duration::days(7),
            },
        };

        let response = render(StatusCode::OK, &page);
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get("content-type")
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );

        let html = body_text(response).await;
        assert!(html.contains("&#60;b&#62;Title&#60;/b&#62;"));
        assert!(!html.contains("<b>Title"));
        assert!(html.contains("Snippet successfully created!"));
        assert!(html.contains("17 Mar 2024 at 10:15"));
        assert!(html.contains("#7"));
        assert!(html.contains("2024"));
        assert!(html.contains("value='tok'"));
    }

    #[tokio::test]
    async fn test_render_create_page_with_errors() {
        let mut errors = FieldErrors::default();
        errors.add("title", "This field cannot be blank");
        let page = CreatePage {
            data: data(),
            form: SnippetCreateForm::default(),
            errors,
        };

        let response = render(StatusCode::UNPROCESSABLE_ENTITY, &page);
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let html = body_text(response).await;
        assert!(html.contains("This field cannot be blank"));
        assert!(html.contains("value='365' checked"));
    }
}
