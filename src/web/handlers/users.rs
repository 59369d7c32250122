//! Signup, login, logout and account pages.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use validator::Validate;

use crate::domain::entities::NewUser;
use crate::domain::error::ModelError;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::forms::{FieldErrors, PostForm, UserLoginForm, UserSignupForm};
use crate::web::session::{AUTH_USER_KEY, FLASH_KEY};
use crate::web::templates::{AccountPage, LoginPage, PageContext, SignupPage, render};

/// # Endpoint
///
/// `GET /user/signup`
pub async fn user_signup(page: PageContext) -> Response {
    render(
        StatusCode::OK,
        &SignupPage {
            data: page.template_data(),
            form: UserSignupForm::default(),
            errors: FieldErrors::default(),
        },
    )
}

/// Registers a user.
///
/// # Endpoint
///
/// `POST /user/signup`
///
/// # Responses
///
/// - `303 See Other` to the login page, with a flash message
/// - `422 Unprocessable Entity` on invalid input or an email already in use
pub async fn user_signup_post(
    State(state): State<AppState>,
    page: PageContext,
    PostForm(mut form): PostForm<UserSignupForm>,
) -> Result<Response, AppError> {
    let mut errors = match form.validate() {
        Ok(()) => FieldErrors::default(),
        Err(e) => FieldErrors::from(&e),
    };

    if errors.is_empty() {
        let new_user = NewUser {
            name: form.name.clone(),
            email: form.email.clone(),
            password: std::mem::take(&mut form.password),
        };

        match state.users.insert(new_user).await {
            Ok(()) => {
                tracing::info!(email = %form.email, "user signed up");
                page.session().put(FLASH_KEY, "Your signup was successful. Please log in.");
                return Ok(Redirect::to("/user/login").into_response());
            }
            Err(ModelError::DuplicateEmail) => {
                errors.add("email", "Email address is already in use");
            }
            Err(e) => return Err(e.into()),
        }
    }

    form.password.clear();
    Ok(render(
        StatusCode::UNPROCESSABLE_ENTITY,
        &SignupPage {
            data: page.template_data(),
            form,
            errors,
        },
    ))
}

/// # Endpoint
///
/// `GET /user/login`
pub async fn user_login(page: PageContext) -> Response {
    render(
        StatusCode::OK,
        &LoginPage {
            data: page.template_data(),
            form: UserLoginForm::default(),
            errors: FieldErrors::default(),
        },
    )
}

/// Checks credentials and logs the user in.
///
/// # Endpoint
///
/// `POST /user/login`
///
/// # Responses
///
/// - `303 See Other` to `/snippet/create`; the session token is renewed
/// - `422 Unprocessable Entity` on invalid input or wrong credentials
pub async fn user_login_post(
    State(state): State<AppState>,
    page: PageContext,
    PostForm(mut form): PostForm<UserLoginForm>,
) -> Result<Response, AppError> {
    let mut errors = match form.validate() {
        Ok(()) => FieldErrors::default(),
        Err(e) => FieldErrors::from(&e),
    };

    if errors.is_empty() {
        match state.users.authenticate(&form.email, &form.password).await {
            Ok(id) => {
                let session = page.session();
                session.renew();
                session.put(AUTH_USER_KEY, id.to_string());
                tracing::info!(user_id = id, "user logged in");
                return Ok(Redirect::to("/snippet/create").into_response());
            }
            Err(ModelError::InvalidCredentials) => {
                errors.add_non_field("Email or password is incorrect");
            }
            Err(e) => return Err(e.into()),
        }
    }

    form.password.clear();
    Ok(render(
        StatusCode::UNPROCESSABLE_ENTITY,
        &LoginPage {
            data: page.template_data(),
            form,
            errors,
        },
    ))
}

/// Logs the user out.
///
/// # Endpoint
///
/// `POST /user/logout`
pub async fn user_logout_post(page: PageContext) -> Response {
    let session = page.session();
    session.renew();
    session.remove(AUTH_USER_KEY);
    session.put(FLASH_KEY, "You've been logged out successfully!");

    Redirect::to("/").into_response()
}

/// Shows the logged-in user's details.
///
/// # Endpoint
///
/// `GET /account/view`
///
/// A session naming a user that no longer exists is sent to the login page.
pub async fn account_view(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<Response, AppError> {
    let Some(id) = page.session().get_i64(AUTH_USER_KEY) else {
        return Ok(Redirect::to("/user/login").into_response());
    };

    match state.users.get(id).await {
        Ok(user) => Ok(render(
            StatusCode::OK,
            &AccountPage {
                data: page.template_data(),
                user,
            },
        )),
        Err(ModelError::NoRecord) => Ok(Redirect::to("/user/login").into_response()),
        Err(e) => Err(e.into()),
    }
}
