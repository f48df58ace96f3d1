// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 인메모리 저장소 + 수동 시계로 전체 앱을 구성
//
// 사용법:
// ```rust
// mod common;
// use common::*;
//
// #[tokio::test]
// async fn test_something() {
//     let app = setup_test();
//     let issued = app.register("alice", "pw123", "dev1").await;
//     // 테스트 코드...
// }
// ```
// =====================================================
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use forum_server::domains::auth::services::{AuthService, IssuedSession, JwtService};
use forum_server::routes::create_router;
use forum_server::shared::clock::ManualClock;
use forum_server::shared::config::AppConfig;
use forum_server::shared::database::InMemoryAuthStore;
use forum_server::shared::services::AppState;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// 테스트용 설정 (해싱 비용 최소화)
pub fn test_config() -> AppConfig {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("JWT_SECRET_KEY", TEST_JWT_SECRET),
        ("SECURE_COOKIE", "false"),
        ("ARGON2_MEMORY_KIB", "1024"),
        ("ARGON2_PARALLELISM", "1"),
    ]);
    AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
        .expect("test config should parse")
}

pub struct TestApp {
    pub store: Arc<InMemoryAuthStore>,
    pub clock: ManualClock,
    pub state: AppState,
    pub router: Router,
}

/// 테스트 앱 생성
pub fn setup_test() -> TestApp {
    let store = Arc::new(InMemoryAuthStore::new());
    let clock = ManualClock::default();
    let state = AppState::new(
        test_config(),
        store.clone(),
        store.clone(),
        Arc::new(clock.clone()),
    )
    .expect("Failed to initialize AppState");
    let router = create_router().with_state(state.clone());

    TestApp {
        store,
        clock,
        state,
        router,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Set-Cookie에서 Refresh-Token 값 추출
    pub fn refresh_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|cookie| cookie.strip_prefix("Refresh-Token="))
            .and_then(|rest| rest.split(';').next())
            .map(str::to_string)
    }
}

/// HTTP 요청 빌더
pub struct ApiRequest {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::new(Method::POST, uri)
    }

    fn new(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn device(self, device_id: &str) -> Self {
        self.header("Device-ID", device_id)
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", &format!("Bearer {}", token))
    }

    pub fn cookie(self, refresh_token: &str) -> Self {
        self.header("Cookie", &format!("Refresh-Token={}", refresh_token))
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl TestApp {
    pub fn auth(&self) -> &AuthService {
        &self.state.auth_state.auth_service
    }

    pub fn jwt(&self) -> &JwtService {
        &self.state.auth_state.jwt_service
    }

    /// 라우터에 요청 전송
    pub async fn send(&self, request: ApiRequest) -> TestResponse {
        let mut builder = Request::builder().method(request.method).uri(request.uri);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let body = match request.body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// 서비스 직접 호출로 회원가입
    pub async fn register(&self, username: &str, password: &str, device_id: &str) -> IssuedSession {
        self.auth()
            .register(username, password, device_id)
            .await
            .expect("register should succeed")
    }

    pub async fn login(&self, username: &str, password: &str, device_id: &str) -> IssuedSession {
        self.auth()
            .login(username, password, device_id)
            .await
            .expect("login should succeed")
    }
}
