use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Refresh Token 쿠키 이름
pub const REFRESH_COOKIE_NAME: &str = "Refresh-Token";

/// 쿠키 속성 설정
/// Cookie attributes shared by set/clear
#[derive(Debug, Clone, Copy)]
pub struct CookieConfig {
    pub secure: bool,
    pub max_age: Duration,
}

impl CookieConfig {
    /// Refresh TTL(chrono)로부터 생성
    pub fn new(secure: bool, refresh_ttl: chrono::Duration) -> Self {
        Self {
            secure,
            max_age: Duration::seconds(refresh_ttl.num_seconds()),
        }
    }
}

/// Refresh Token을 담는 HttpOnly 쿠키 생성
/// Build the cookie carrying the refresh token
pub fn refresh_cookie(token: impl Into<String>, config: CookieConfig) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE_NAME, token.into()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(config.secure)
        .max_age(config.max_age)
        .build()
}

/// 로그아웃 시 쿠키 삭제 (Max-Age=0)
/// Removal cookie, emitted whether or not the client sent the cookie
pub fn removal_cookie(config: CookieConfig) -> Cookie<'static> {
    let mut cookie = refresh_cookie("", config);
    cookie.make_removal();
    cookie
}

/// 요청 쿠키에서 Refresh Token 조회
pub fn refresh_token_from(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header};

    fn config(secure: bool) -> CookieConfig {
        CookieConfig::new(secure, chrono::Duration::days(14))
    }

    #[test]
    fn test_refresh_cookie_attributes() {
        let cookie = refresh_cookie("abc.def.ghi", config(true));

        assert_eq!(cookie.name(), REFRESH_COOKIE_NAME);
        assert_eq!(cookie.value(), "abc.def.ghi");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(1_209_600)));

        let rendered = cookie.to_string();
        assert!(rendered.contains("Max-Age=1209600"));

        let insecure = refresh_cookie("t", config(false)).to_string();
        assert!(!insecure.contains("Secure"));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = removal_cookie(config(false));

        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert!(cookie.to_string().contains("Max-Age=0"));
    }

    #[test]
    fn test_refresh_token_from_request_cookies() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark; Refresh-Token=tok123"));
        headers.append(header::COOKIE, HeaderValue::from_static("other=1"));

        let jar = CookieJar::from_headers(&headers);
        assert_eq!(refresh_token_from(&jar).as_deref(), Some("tok123"));

        let mut empty = HeaderMap::new();
        empty.insert(header::COOKIE, HeaderValue::from_static("Refresh-Token="));
        assert_eq!(refresh_token_from(&CookieJar::from_headers(&empty)), None);

        assert_eq!(refresh_token_from(&CookieJar::new()), None);
    }
}
