// Auth domain routes
// 사용자 인증 라우터
use axum::{
    Router,
    routing::{get, post},
};

use crate::domains::auth::handlers::auth_handler;
use crate::shared::services::AppState;

/// Create users router (register/login/refresh/logout/profile)
/// 사용자 라우터 생성
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth_handler::register))
        .route("/login", post(auth_handler::login))
        .route("/refresh", post(auth_handler::refresh))
        .route("/refresh_new", post(auth_handler::refresh_new))
        .route("/logout", post(auth_handler::logout))
        .route("/logout_all", post(auth_handler::logout_all))
        .route("/me", get(auth_handler::get_me))
        .route(
            "/profile",
            get(auth_handler::get_profile).post(auth_handler::update_profile),
        )
        .route("/profile/:username", get(auth_handler::get_public_profile))
        .route("/update_password", post(auth_handler::update_password))
}
