// =====================================================
// AppConfig - 애플리케이션 설정
// =====================================================
// 역할: 서버 시작 시 환경 변수에서 한 번만 읽고 이후 읽기 전용으로 공유
//
// 필수:
//   - JWT_SECRET_KEY: 토큰 서명 키
//   - SECURE_COOKIE: "true" | "false"
//
// 선택 (기본값 있음):
//   - BIND_ADDR, DATABASE_URL, DATABASE_MAX_CONNECTIONS, CORS_ORIGIN
//   - ACCESS_TOKEN_TTL_SECS, REFRESH_TOKEN_TTL_DAYS
//   - ARGON2_MEMORY_KIB, ARGON2_ITERATIONS, ARGON2_PARALLELISM
//   - SESSION_SWEEP_INTERVAL_SECS
// =====================================================

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};

/// Access Token 최대 수명 (1일)
pub const MAX_ACCESS_TTL_SECS: i64 = 24 * 60 * 60;
/// Refresh Token 최대 수명 (1년)
pub const MAX_REFRESH_TTL_DAYS: i64 = 365;

/// 토큰 발급 설정
/// Token issuer configuration
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl: chrono::Duration,
    pub refresh_ttl: chrono::Duration,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl: chrono::Duration::seconds(30),
            refresh_ttl: chrono::Duration::days(14),
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// Argon2id 비용 파라미터
/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    pub output_len: usize,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 1,
            parallelism: 2,
            output_len: 32,
        }
    }
}

/// 전체 애플리케이션 설정
/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// 없으면 인메모리 저장소로 동작
    /// Falls back to the in-memory store when unset
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub database_acquire_timeout: Duration,
    pub cors_origin: String,
    pub secure_cookie: bool,
    pub jwt: JwtConfig,
    pub hashing: HashingConfig,
    pub sweep_interval: Duration,
}

impl AppConfig {
    /// 환경 변수에서 설정 읽기
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 키-값 소스에서 설정 읽기 (테스트에서 사용)
    /// Load configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET_KEY")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("JWT_SECRET_KEY must be set"))?;

        let secure_cookie = match lookup("SECURE_COOKIE").as_deref() {
            Some("true") => true,
            Some("false") => false,
            other => bail!("invalid SECURE_COOKIE value: {:?} (expected \"true\" or \"false\")", other),
        };

        let access_ttl_secs: i64 = parse_or(&lookup, "ACCESS_TOKEN_TTL_SECS", 30)?;
        let refresh_ttl_days: i64 = parse_or(&lookup, "REFRESH_TOKEN_TTL_DAYS", 14)?;
        if !(1..=MAX_ACCESS_TTL_SECS).contains(&access_ttl_secs) {
            bail!("ACCESS_TOKEN_TTL_SECS must be between 1 and {}", MAX_ACCESS_TTL_SECS);
        }
        if !(1..=MAX_REFRESH_TTL_DAYS).contains(&refresh_ttl_days) {
            bail!("REFRESH_TOKEN_TTL_DAYS must be between 1 and {}", MAX_REFRESH_TTL_DAYS);
        }
        let access_ttl = chrono::Duration::try_seconds(access_ttl_secs)
            .context("ACCESS_TOKEN_TTL_SECS out of range")?;
        let refresh_ttl = chrono::Duration::try_days(refresh_ttl_days)
            .context("REFRESH_TOKEN_TTL_DAYS out of range")?;

        let sweep_interval_secs: u64 =
            parse_or(&lookup, "SESSION_SWEEP_INTERVAL_SECS", 6 * 60 * 60)?;
        if sweep_interval_secs == 0 {
            bail!("SESSION_SWEEP_INTERVAL_SECS must be positive");
        }

        let defaults = HashingConfig::default();
        let hashing = HashingConfig {
            memory_kib: parse_or(&lookup, "ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "ARGON2_PARALLELISM", defaults.parallelism)?,
            output_len: defaults.output_len,
        };

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3002".to_string()),
            database_url: lookup("DATABASE_URL").filter(|s| !s.is_empty()),
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            database_acquire_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                5,
            )?),
            cors_origin: lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3003".to_string()),
            secure_cookie,
            jwt: JwtConfig {
                secret,
                access_ttl,
                refresh_ttl,
            },
            hashing,
            sweep_interval: Duration::from_secs(sweep_interval_secs),
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
