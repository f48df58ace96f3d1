use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::domains::auth::models::{
    AccountResponse, AuthResponse, LoginRequest, MessageResponse, Profile, RefreshTokenRequest,
    RefreshTokenResponse, RegisterRequest, SessionRestoreResponse, UpdatePasswordRequest,
    UpdateProfileRequest,
};
use crate::domains::auth::services::IssuedSession;
use crate::shared::errors::AuthError;
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::middleware::ownership::{OwnedResource, ensure_owner};
use crate::shared::services::AppState;
use crate::shared::utils::{
    device_id_from_headers, refresh_cookie, refresh_token_from, removal_cookie,
};

/// 갱신 결과 헤더 (`success` / `failed`)
pub const REFRESH_STATUS_HEADER: &str = "x-refresh-token";

// 회원가입 핸들러
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    params(
        ("Device-ID" = String, Header, description = "Client device identifier")
    ),
    responses(
        (status = 200, description = "Account created, session started", body = AuthResponse),
        (status = 400, description = "Missing Device-ID or empty username/password"),
        (status = 409, description = "Username already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users"
)]
pub async fn register(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, AuthError> {
    let device_id = device_id_from_headers(&headers)?;

    // Service 호출 (계정 + 프로필 + 세션)
    let issued = app_state
        .auth_state
        .auth_service
        .register(&request.username, &request.password, &device_id)
        .await?;

    Ok(session_response(&app_state, jar, issued))
}

// 로그인 핸들러
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    params(
        ("Device-ID" = String, Header, description = "Client device identifier")
    ),
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing Device-ID or empty username/password"),
        (status = 401, description = "Invalid username or password"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users"
)]
pub async fn login(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AuthError> {
    let device_id = device_id_from_headers(&headers)?;

    let issued = app_state
        .auth_state
        .auth_service
        .login(&request.username, &request.password, &device_id)
        .await?;

    Ok(session_response(&app_state, jar, issued))
}

/// 토큰 갱신 핸들러 (Access Token만 재발급)
/// Refresh handler
#[utoipa::path(
    post,
    path = "/api/users/refresh",
    request_body(content = RefreshTokenRequest, description = "Optional; the Refresh-Token cookie is used when present"),
    params(
        ("Device-ID" = String, Header, description = "Client device identifier")
    ),
    responses(
        (status = 201, description = "New access token issued", body = RefreshTokenResponse),
        (status = 400, description = "Missing Device-ID"),
        (status = 401, description = "Refresh token invalid, expired or revoked (X-Refresh-Token: failed)"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users"
)]
pub async fn refresh(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    body: Option<Json<RefreshTokenRequest>>,
) -> Response {
    let result = async {
        let (device_id, refresh_token) = refresh_inputs(&headers, &jar, body)?;
        let access_token = app_state
            .auth_state
            .auth_service
            .refresh(&device_id, &refresh_token)
            .await?;
        Ok::<_, AuthError>(access_token)
    }
    .await;

    match result {
        Ok(access_token) => {
            let response = (StatusCode::CREATED, Json(RefreshTokenResponse { access_token }));
            with_refresh_status(response.into_response(), "success")
        }
        Err(e) => refresh_failure(e),
    }
}

/// 세션 복원 핸들러 (앱 시작 시 계정/프로필 함께 반환)
/// Session restore handler
#[utoipa::path(
    post,
    path = "/api/users/refresh_new",
    request_body(content = RefreshTokenRequest, description = "Optional; the Refresh-Token cookie is used when present"),
    params(
        ("Device-ID" = String, Header, description = "Client device identifier")
    ),
    responses(
        (status = 200, description = "Session restored", body = SessionRestoreResponse),
        (status = 400, description = "Missing Device-ID"),
        (status = 401, description = "Refresh token invalid, expired or revoked (X-Refresh-Token: failed)"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users"
)]
pub async fn refresh_new(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    body: Option<Json<RefreshTokenRequest>>,
) -> Response {
    let result = async {
        let (device_id, refresh_token) = refresh_inputs(&headers, &jar, body)?;
        let restored = app_state
            .auth_state
            .auth_service
            .restore_session(&device_id, &refresh_token)
            .await?;
        Ok::<_, AuthError>((restored, refresh_token))
    }
    .await;

    match result {
        Ok((restored, refresh_token)) => {
            let response = Json(SessionRestoreResponse {
                account: restored.account.into(),
                profile: restored.profile,
                access_token: restored.access_token,
                refresh_token,
            });
            with_refresh_status(response.into_response(), "success")
        }
        Err(e) => refresh_failure(e),
    }
}

/// 로그아웃 핸들러 (현재 기기)
/// Logout handler
#[utoipa::path(
    post,
    path = "/api/users/logout",
    params(
        ("Device-ID" = String, Header, description = "Client device identifier")
    ),
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse),
        (status = 400, description = "Missing Device-ID"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Users"
)]
pub async fn logout(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<Response, AuthError> {
    let device_id = device_id_from_headers(&headers)?;

    app_state
        .auth_state
        .auth_service
        .logout(authenticated_user.account_id, &device_id)
        .await?;

    Ok(logged_out_response(&app_state, jar, "Logout successful"))
}

/// 모든 기기에서 로그아웃
/// Logout from every device
#[utoipa::path(
    post,
    path = "/api/users/logout_all",
    responses(
        (status = 200, description = "All sessions revoked", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Users"
)]
pub async fn logout_all(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    jar: CookieJar,
) -> Result<Response, AuthError> {
    let removed = app_state
        .auth_state
        .auth_service
        .logout_all_devices(authenticated_user.account_id)
        .await?;

    Ok(logged_out_response(
        &app_state,
        jar,
        format!("Logged out from {} device(s)", removed),
    ))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Account info retrieved successfully", body = AccountResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Users"
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<AccountResponse>, AuthError> {
    let account = app_state
        .auth_state
        .auth_service
        .get_account(authenticated_user.account_id)
        .await?;

    Ok(Json(account.into()))
}

#[utoipa::path(
    get,
    path = "/api/users/profile",
    responses(
        (status = 200, description = "Own profile", body = Profile),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Users"
)]
pub async fn get_profile(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<Profile>, AuthError> {
    let profile = app_state
        .auth_state
        .auth_service
        .get_profile(authenticated_user.account_id)
        .await?;

    Ok(Json(profile))
}

/// 공개 프로필 조회 (사용자명)
#[utoipa::path(
    get,
    path = "/api/users/profile/{username}",
    params(
        ("username" = String, Path, description = "Username to look up")
    ),
    responses(
        (status = 200, description = "Public profile", body = Profile),
        (status = 404, description = "Account not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users"
)]
pub async fn get_public_profile(
    State(app_state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Profile>, AuthError> {
    let profile = app_state
        .auth_state
        .auth_service
        .get_public_profile(&username)
        .await?;

    Ok(Json(profile))
}

#[utoipa::path(
    post,
    path = "/api/users/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the profile owner"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Users"
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, AuthError> {
    let auth_service = &app_state.auth_state.auth_service;

    // 소유자 확인 후 수정
    let profile = auth_service.get_profile(authenticated_user.account_id).await?;
    ensure_owner(
        &OwnedResource::Profile {
            account_id: profile.account_id,
        },
        &authenticated_user,
    )?;

    let updated = auth_service
        .update_profile(
            profile.account_id,
            &request.biodata,
            request.email.as_deref(),
        )
        .await?;

    Ok(Json(updated))
}

#[utoipa::path(
    post,
    path = "/api/users/update_password",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Empty new password"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Current password is incorrect"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Users"
)]
pub async fn update_password(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    app_state
        .auth_state
        .auth_service
        .change_password(
            authenticated_user.account_id,
            &request.old_password,
            &request.new_password,
        )
        .await?;

    Ok(Json(MessageResponse::new("Password changed")))
}

// 쿠키 우선, 없으면 본문의 refresh_token
fn refresh_inputs(
    headers: &HeaderMap,
    jar: &CookieJar,
    body: Option<Json<RefreshTokenRequest>>,
) -> Result<(String, String), AuthError> {
    let device_id = device_id_from_headers(headers)?;
    let refresh_token = refresh_token_from(jar)
        .or_else(|| body.and_then(|Json(request)| request.refresh_token))
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)?;

    Ok((device_id, refresh_token))
}

fn session_response(app_state: &AppState, jar: CookieJar, issued: IssuedSession) -> Response {
    let cookie = refresh_cookie(issued.refresh_token.clone(), app_state.cookie_config());

    let body = Json(AuthResponse {
        account_id: issued.account.id,
        username: issued.account.username,
        access_token: issued.access_token,
        refresh_token: issued.refresh_token,
    });

    (jar.add(cookie), body).into_response()
}

fn logged_out_response(app_state: &AppState, jar: CookieJar, message: impl Into<String>) -> Response {
    let jar = jar.add(removal_cookie(app_state.cookie_config()));
    (jar, Json(MessageResponse::new(message))).into_response()
}

fn with_refresh_status(mut response: Response, status: &'static str) -> Response {
    response.headers_mut().insert(
        HeaderName::from_static(REFRESH_STATUS_HEADER),
        HeaderValue::from_static(status),
    );
    response
}

// 재로그인이 필요한 실패만 `failed` 표시 (내부 에러는 재시도 가능)
fn refresh_failure(err: AuthError) -> Response {
    let relogin = err.requires_relogin();
    let response = err.into_response();
    if relogin {
        with_refresh_status(response, "failed")
    } else {
        response
    }
}
