// Routes module: 라우팅 설정
// 역할: 모든 도메인의 라우터를 조합
// Routes module: combines all domain routers

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::domains::auth::routes::create_auth_router;
use crate::shared::layers::apply_http_layers;
use crate::shared::services::AppState;

/// Create main router (combines all domain routers)
/// 메인 라우터 생성 (모든 도메인 라우터 조합 + 공통 레이어)
pub fn create_router() -> Router<AppState> {
    let router = Router::new()
        .route("/api/healthcheck", get(healthcheck))
        .nest("/api/users", create_auth_router());

    apply_http_layers(router)
}

async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
