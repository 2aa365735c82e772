//! Fills the request path into error response bodies.

use axum::{
    body::Body,
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};

use crate::error::ErrorBody;

/// Rewrites [`ErrorBody`] responses so `path` holds the request path.
///
/// [`crate::error::AppError`] attaches its body to the response extensions;
/// any other response passes through untouched.
pub async fn layer(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let response = next.run(req).await;

    if response.extensions().get::<ErrorBody>().is_none() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let Some(error) = parts.extensions.remove::<ErrorBody>() else {
        return Response::from_parts(parts, body);
    };

    match serde_json::to_vec(&ErrorBody { path, ..error }) {
        Ok(bytes) => {
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(_) => Response::from_parts(parts, body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use axum::{Router, http::StatusCode, middleware, routing::get};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn failing() -> AppError {
        AppError::not_found("Short URL not found", json!({}))
    }

    async fn ok() -> &'static str {
        "fine"
    }

    fn app() -> Router {
        Router::new()
            .route("/fail/{code}", get(failing))
            .route("/ok", get(ok))
            .layer(middleware::from_fn(layer))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_fills_request_path() {
        let response = app()
            .oneshot(Request::builder().uri("/fail/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<ErrorBody>().is_none());

        let body = body_json(response).await;
        assert_eq!(body["status"], 404);
        assert_eq!(body["error"], "Not Found");
        assert_eq!(body["path"], "/fail/abc");
        assert_eq!(body["message"], "Short URL not found");
    }

    #[tokio::test]
    async fn test_passes_successful_responses_through() {
        let response = app()
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"fine");
    }
}
