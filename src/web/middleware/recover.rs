//! Panic recovery middleware.

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::AssertUnwindSafe;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::http::header::CONNECTION;
use axum::middleware::Next;
use axum::response::Response;
use futures::FutureExt;

use crate::error::internal_server_error;
use crate::web::middleware::secure_headers;

/// Catches a panic raised by any later stage of the chain.
///
/// The panic message and a backtrace are logged at error level. The client
/// gets a generic 500 with `Connection: close`, since a connection whose
/// request panicked mid-flight is not reused. The security headers are set
/// here too because the panic unwound past [`secure_headers::secure_headers`].
///
/// Only panics raised while polling this request's future are caught. Tasks
/// spawned with `tokio::spawn` must catch their own panics.
pub async fn recover_panic(req: Request, next: Next) -> Response {
    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            let trace = Backtrace::force_capture();
            tracing::error!(
                panic = %panic_message(panic.as_ref()),
                trace = %trace,
                "recovered from panic while handling request"
            );

            let mut response = internal_server_error();
            let headers = response.headers_mut();
            secure_headers::apply(headers);
            headers.insert(CONNECTION, HeaderValue::from_static("close"));
            response
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Chain, Middleware};
    use axum::body::{Body, to_bytes};
    use axum::http::StatusCode;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    async fn boom() -> &'static str {
        panic!("boom")
    }

    async fn fine() -> &'static str {
        "fine"
    }

    fn request() -> Request {
        Request::builder().uri("/").body(Body::empty()).unwrap()
    }

    #[tokio::test]
    #[traced_test]
    async fn test_panic_becomes_generic_500_with_connection_close() {
        let chain = Chain::new([Middleware::from_layer(from_fn(recover_panic))]);
        let app = chain.then(get(boom));

        let response = app.oneshot(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers().get(CONNECTION).unwrap(), "close");
        for (name, value) in secure_headers::SECURITY_HEADERS {
            assert_eq!(response.headers().get(&name).unwrap(), value, "header {name}");
        }

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(body, "Internal Server Error\n");
        assert!(!body.contains("boom"));

        assert!(logs_contain("boom"));
        assert!(logs_contain("trace="));
    }

    #[tokio::test]
    async fn test_normal_response_passes_through() {
        let chain = Chain::new([Middleware::from_layer(from_fn(recover_panic))]);
        let response = chain.then(get(fine)).oneshot(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(CONNECTION).is_none());
    }

    #[tokio::test]
    async fn test_covers_panics_in_inner_middleware() {
        async fn panicking_middleware(_req: Request, _next: Next) -> Response {
            panic!("middleware exploded")
        }

        let chain = Chain::new([
            Middleware::from_layer(from_fn(recover_panic)),
            Middleware::from_layer(from_fn(panicking_middleware)),
        ]);
        let response = chain.then(get(fine)).oneshot(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_panic_message_extraction() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
        let other: Box<dyn Any + Send> = Box::new(7_u8);

        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(borrowed.as_ref()), "borrowed");
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }
}
