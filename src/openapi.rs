use utoipa::OpenApi;

use crate::domains::auth::models::*;

// OpenAPI 스키마 정의: Swagger 문서 자동 생성
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::domains::auth::handlers::auth_handler::register,
        crate::domains::auth::handlers::auth_handler::login,
        crate::domains::auth::handlers::auth_handler::refresh,
        crate::domains::auth::handlers::auth_handler::refresh_new,
        crate::domains::auth::handlers::auth_handler::logout,
        crate::domains::auth::handlers::auth_handler::logout_all,
        crate::domains::auth::handlers::auth_handler::get_me,
        crate::domains::auth::handlers::auth_handler::get_profile,
        crate::domains::auth::handlers::auth_handler::get_public_profile,
        crate::domains::auth::handlers::auth_handler::update_profile,
        crate::domains::auth::handlers::auth_handler::update_password
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        RefreshTokenRequest,
        RefreshTokenResponse,
        SessionRestoreResponse,
        UpdatePasswordRequest,
        UpdateProfileRequest,
        MessageResponse,
        AccountResponse,
        Profile
    )),
    modifiers(
        &SecurityAddon
    ),
    tags(
        (name = "Users", description = "Account, session and profile endpoints")
    ),
    info(
        title = "Forum API Server",
        description = "Authentication and session backend for the forum",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

// Security scheme 정의: Swagger UI에서 "Authorize" 버튼 추가
pub struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
