use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::error::ServiceError;

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(600);

/// CORS headers for the single allowed origin; other origins get none.
pub fn build_cors_layer(allowed_origin: &HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list([allowed_origin.clone()]))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(PREFLIGHT_MAX_AGE)
}

/// Rejects requests whose `Origin` is not the allowed one. Requests without
/// an `Origin` header are not cross-origin and pass through.
pub async fn reject_foreign_origin(
    State(allowed_origin): State<HeaderValue>,
    request: Request,
    next: Next,
) -> Response {
    let foreign = request
        .headers()
        .get(header::ORIGIN)
        .filter(|origin| **origin != allowed_origin)
        .cloned();

    if let Some(origin) = foreign {
        tracing::warn!(?origin, "rejecting request from disallowed origin");
        return ServiceError::ForbiddenOrigin.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::StatusCode,
        middleware,
        routing::post,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        let allowed = HeaderValue::from_static("https://allowed.example");
        Router::new()
            .route("/", post(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(
                allowed.clone(),
                reject_foreign_origin,
            ))
            .layer(build_cors_layer(&allowed))
    }

    fn request(origin: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(origin) = origin {
            builder = builder.header(header::ORIGIN, origin);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn allowed_origin_gets_cors_headers() {
        let resp = app()
            .oneshot(request(Some("https://allowed.example")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "https://allowed.example"
        );
    }

    #[tokio::test]
    async fn other_origins_are_forbidden() {
        let resp = app()
            .oneshot(request(Some("https://evil.example")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }

    #[tokio::test]
    async fn requests_without_origin_pass() {
        let resp = app().oneshot(request(None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
