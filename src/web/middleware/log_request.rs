//! Request logging middleware.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Logs one line per request, then hands the request on untouched.
///
/// # Example Logs
///
/// ```text
/// INFO received request remote_addr=127.0.0.1:53012 proto=HTTP/1.1 method=GET uri=/snippet/view/1
/// ```
///
/// The remote address comes from the connection info installed by the
/// server; requests without it (tests, in-process calls) log `-`.
pub async fn log_request(req: Request, next: Next) -> Response {
    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());

    tracing::info!(
        remote_addr = %remote_addr,
        proto = ?req.version(),
        method = %req.method(),
        uri = %req.uri(),
        "received request"
    );

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Chain, Middleware};
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::middleware::from_fn;
    use axum::routing::post;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    async fn echo(body: String) -> String {
        body
    }

    #[tokio::test]
    #[traced_test]
    async fn test_logs_request_line_and_passes_request_through() {
        let chain = Chain::new([Middleware::from_layer(from_fn(log_request))]);
        let mut req = Request::builder()
            .method("POST")
            .uri("/snippet/create?draft=1")
            .body(Body::from("payload"))
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 7], 4242))));

        let response = chain.then(post(echo)).oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"payload");

        assert!(logs_contain("received request"));
        assert!(logs_contain("10.0.0.7:4242"));
        assert!(logs_contain("POST"));
        assert!(logs_contain("/snippet/create?draft=1"));
        assert!(logs_contain("HTTP/1.1"));
    }
}
