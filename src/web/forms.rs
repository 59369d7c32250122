//! Form decoding and validation.
//!
//! Decoding failures come in two kinds:
//!
//! - [`FormError::Malformed`] - the client sent something unparsable; the
//!   request is answered with `400 Bad Request`
//! - [`FormError::Defect`] - the destination type can never be filled from a
//!   flat urlencoded body; logged as a programming error and answered with 500
//!
//! Decoded forms are then checked with `validator`; failures are collected
//! into [`FieldErrors`] and the page is re-rendered with `422`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use axum::body::to_bytes;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;

/// Largest form body accepted, in bytes.
pub const MAX_FORM_BYTES: usize = 1024 * 1024;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Expiry choices offered by the create form, in days.
pub const PERMITTED_EXPIRY_DAYS: [i32; 3] = [1, 7, 365];

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("malformed form data: {0}")]
    Malformed(String),

    /// The body could not be buffered within [`MAX_FORM_BYTES`].
    #[error("form body rejected: {0}")]
    TooLarge(String),

    #[error("form destination cannot be decoded: {0}")]
    Defect(String),
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Malformed(reason) => {
                tracing::debug!(%reason, "rejected malformed form");
                AppError::Client(StatusCode::BAD_REQUEST)
            }
            FormError::TooLarge(reason) => {
                tracing::debug!(%reason, "rejected oversized form");
                AppError::Client(StatusCode::PAYLOAD_TOO_LARGE)
            }
            FormError::Defect(reason) => AppError::Defect(reason),
        }
    }
}

/// Sorts a decoder error into client input versus destination type.
///
/// A flat urlencoded value reaching a field that wants a struct, sequence,
/// map or tuple fails the same way for every possible input, so that error
/// points at the type rather than the body.
fn classify(err: serde_urlencoded::de::Error) -> FormError {
    let message = err.to_string();

    let structural = message.starts_with("invalid type:")
        && [
            "expected struct",
            "expected a sequence",
            "expected a map",
            "expected a tuple",
        ]
        .iter()
        .any(|needle| message.contains(needle));

    if structural {
        FormError::Defect(message)
    } else {
        FormError::Malformed(message)
    }
}

/// Decodes a urlencoded body into `T`.
pub fn decode_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, FormError> {
    serde_urlencoded::from_bytes(body).map_err(classify)
}

/// Reads and decodes a urlencoded request body.
///
/// # Errors
///
/// [`FormError::Malformed`] if the content type is wrong or the body does not
/// decode. [`FormError::TooLarge`] if the body exceeds [`MAX_FORM_BYTES`]. [`FormError::Defect`] if `T` can never be
/// decoded from a form.
pub async fn decode_post_form<T: DeserializeOwned>(req: Request) -> Result<T, FormError> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !content_type.starts_with(FORM_CONTENT_TYPE) {
        return Err(FormError::Malformed(format!(
            "unexpected content type '{content_type}'"
        )));
    }

    let body = to_bytes(req.into_body(), MAX_FORM_BYTES)
        .await
        .map_err(|e| FormError::TooLarge(e.to_string()))?;

    decode_form(&body)
}

/// Extractor for a decoded POST form.
///
/// Rejects with [`AppError`], so malformed input becomes a 400 and a
/// defective destination a logged 500.
#[derive(Debug, Clone)]
pub struct PostForm<T>(pub T);

impl<S, T> FromRequest<S> for PostForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(PostForm(decode_post_form(req).await?))
    }
}

/// Per-field messages plus messages about the form as a whole.
#[derive(Debug, Clone, Default)]
pub struct FieldErrors {
    fields: HashMap<String, String>,
    non_field: Vec<String>,
}

impl FieldErrors {
    /// Records `message` for `field` unless the field already has one.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_insert_with(|| message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn non_field(&self) -> &[String] {
        &self.non_field
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut out = FieldErrors::default();
        for (field, errs) in errors.field_errors() {
            // A blank field reports blankness, not a failed format check.
            let chosen = errs
                .iter()
                .find(|e| e.code == "blank")
                .or_else(|| errs.first());
            if let Some(error) = chosen {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message(Cow::Borrowed("This field cannot be blank")));
    }
    Ok(())
}

fn permitted_expiry(value: i32) -> Result<(), ValidationError> {
    if !PERMITTED_EXPIRY_DAYS.contains(&value) {
        return Err(ValidationError::new("expiry")
            .with_message(Cow::Borrowed("This field must equal 1, 7 or 365")));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SnippetCreateForm {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "This field cannot be more than 100 characters long")
    )]
    pub title: String,

    #[validate(custom(function = "not_blank"))]
    pub content: String,

    #[validate(custom(function = "permitted_expiry"))]
    pub expires: i32,
}

impl Default for SnippetCreateForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            expires: 365,
        }
    }
}

#[derive(Clone, Default, Deserialize, Validate)]
pub struct UserSignupForm {
    #[validate(custom(function = "not_blank"))]
    pub name: String,

    #[validate(
        custom(function = "not_blank"),
        email(message = "This field must be a valid email address")
    )]
    pub email: String,

    #[validate(
        custom(function = "not_blank"),
        length(min = 8, message = "This field must be at least 8 characters long")
    )]
    pub password: String,
}

impl fmt::Debug for UserSignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserSignupForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Clone, Default, Deserialize, Validate)]
pub struct UserLoginForm {
    #[validate(
        custom(function = "not_blank"),
        email(message = "This field must be a valid email address")
    )]
    pub email: String,

    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

impl fmt::Debug for UserLoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserLoginForm")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::response::IntoResponse;

    #[derive(Debug, Deserialize)]
    struct Inner {
        #[allow(dead_code)]
        value: String,
    }

    #[derive(Debug, Deserialize)]
    struct Nested {
        #[allow(dead_code)]
        inner: Inner,
    }

    #[derive(Debug, Deserialize)]
    struct WithList {
        #[allow(dead_code)]
        tags: Vec<String>,
    }

    fn form_request(body: impl Into<String>) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(Body::from(body.into()))
            .unwrap()
    }

    #[test]
    fn test_decode_valid_form_ignores_extra_fields() {
        let form: SnippetCreateForm =
            decode_form(b"title=Hi+there&content=a%26b&expires=7&csrf_token=abc").unwrap();

        assert_eq!(form.title, "Hi there");
        assert_eq!(form.content, "a&b");
        assert_eq!(form.expires, 7);
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let err = decode_form::<SnippetCreateForm>(b"title=x&expires=7").unwrap_err();
        assert!(matches!(err, FormError::Malformed(_)), "{err}");
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let err =
            decode_form::<SnippetCreateForm>(b"title=x&content=y&expires=soon").unwrap_err();
        assert!(matches!(err, FormError::Malformed(_)), "{err}");
    }

    #[test]
    fn test_nested_struct_destination_is_defect() {
        let err = decode_form::<Nested>(b"inner=x").unwrap_err();
        assert!(matches!(err, FormError::Defect(_)), "{err}");
    }

    #[test]
    fn test_sequence_destination_is_defect() {
        let err = decode_form::<WithList>(b"tags=a").unwrap_err();
        assert!(matches!(err, FormError::Defect(_)), "{err}");
    }

    #[tokio::test]
    async fn test_defect_becomes_500_and_malformed_becomes_400() {
        let defect: AppError = decode_form::<Nested>(b"inner=x").unwrap_err().into();
        assert_eq!(
            defect.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let malformed: AppError = decode_form::<SnippetCreateForm>(b"").unwrap_err().into();
        assert_eq!(malformed.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_decode_post_form_requires_form_content_type() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"title":"x"}"#))
            .unwrap();

        let err = decode_post_form::<SnippetCreateForm>(req).await.unwrap_err();
        assert!(matches!(err, FormError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_oversized_body_is_413() {
        let body = format!("title={}", "a".repeat(MAX_FORM_BYTES));

        let err = decode_post_form::<SnippetCreateForm>(form_request(body))
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::TooLarge(_)), "{err}");

        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_decode_post_form() {
        let form: UserLoginForm =
            decode_post_form(form_request("email=alice%40example.com&password=pa55word"))
                .await
                .unwrap();

        assert_eq!(form.email, "alice@example.com");
        assert_eq!(form.password, "pa55word");
    }

    #[test]
    fn test_snippet_validation_messages() {
        let form = SnippetCreateForm {
            title: "   ".to_string(),
            content: "body".to_string(),
            expires: 30,
        };
        let errors = FieldErrors::from(&form.validate().unwrap_err());

        assert_eq!(errors.get("title"), Some("This field cannot be blank"));
        assert_eq!(errors.get("expires"), Some("This field must equal 1, 7 or 365"));
        assert_eq!(errors.get("content"), None);
    }

    #[test]
    fn test_title_length_counts_characters() {
        let mut form = SnippetCreateForm {
            title: "é".repeat(100),
            content: "body".to_string(),
            expires: 1,
        };
        assert!(form.validate().is_ok());

        form.title.push('é');
        let errors = FieldErrors::from(&form.validate().unwrap_err());
        assert_eq!(
            errors.get("title"),
            Some("This field cannot be more than 100 characters long")
        );
    }

    #[test]
    fn test_signup_validation() {
        let form = UserSignupForm {
            name: "Alice".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = FieldErrors::from(&form.validate().unwrap_err());

        assert_eq!(errors.get("name"), None);
        assert_eq!(
            errors.get("email"),
            Some("This field must be a valid email address")
        );
        assert_eq!(
            errors.get("password"),
            Some("This field must be at least 8 characters long")
        );
    }

    #[test]
    fn test_blank_reported_before_format() {
        let form = UserLoginForm::default();
        let errors = FieldErrors::from(&form.validate().unwrap_err());

        assert_eq!(errors.get("email"), Some("This field cannot be blank"));
        assert_eq!(errors.get("password"), Some("This field cannot be blank"));
    }

    #[test]
    fn test_field_errors_keep_first_message() {
        let mut errors = FieldErrors::default();
        assert!(errors.is_empty());

        errors.add("email", "first");
        errors.add("email", "second");
        errors.add_non_field("Email or password is incorrect");

        assert_eq!(errors.get("email"), Some("first"));
        assert_eq!(errors.non_field(), ["Email or password is incorrect"]);
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_password_is_masked_in_debug() {
        let form = UserLoginForm {
            email: "a@b.c".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(!format!("{form:?}").contains("hunter22"));
    }
}
