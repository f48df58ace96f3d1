use axum::http::HeaderMap;

use crate::shared::errors::AuthError;

/// 기기 식별 헤더 (`Device-ID`, 대소문자 무시)
pub const DEVICE_ID_HEADER: &str = "device-id";

/// Device-ID 헤더 추출 (없거나 비어 있으면 400)
/// Read the `Device-ID` header; missing or blank is a bad request
pub fn device_id_from_headers(headers: &HeaderMap) -> Result<String, AuthError> {
    headers
        .get(DEVICE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(AuthError::MissingDeviceId)
}
