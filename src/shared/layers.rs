use std::any::Any;

use anyhow::{Context, Result};
use axum::{
    Router,
    body::Body,
    http::{HeaderName, HeaderValue, Method, Request, header},
    response::{IntoResponse, Response},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::shared::errors::AuthError;
use crate::shared::utils::DEVICE_ID_HEADER;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 공통 HTTP 레이어 적용
/// Request id, tracing span and panic catching for every route
///
/// 레이어는 나중에 추가한 것이 바깥쪽입니다:
/// SetRequestId → Trace → PropagateRequestId → CatchPanic → handler
pub fn apply_http_layers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

// 핸들러 패닉 → 일반 500 응답 (상세는 로그에만)
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AuthError::Internal(format!("handler panicked: {}", detail)).into_response()
}

/// CORS 설정
/// CORS for the single configured frontend origin (credentials allowed for the cookie)
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = origin
        .parse::<HeaderValue>()
        .with_context(|| format!("invalid CORS origin: {}", origin))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(DEVICE_ID_HEADER),
        ])
        .expose_headers([
            HeaderName::from_static("x-access-token"),
            HeaderName::from_static("x-refresh-token"),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .allow_credentials(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_panic_becomes_generic_500_with_request_id() {
        async fn boom() -> &'static str {
            panic!("secret detail")
        }

        let app = apply_http_layers(Router::new().route("/boom", get(boom)));

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "internal");
        assert!(!body["message"].as_str().unwrap().contains("secret detail"));
    }

    #[test]
    fn test_cors_rejects_invalid_origin() {
        assert!(cors_layer("http://localhost:3003").is_ok());
        assert!(cors_layer("bad\norigin").is_err());
    }
}
