/// 공유 유틸리티 모듈
/// Shared Utilities Module
///
/// 역할:
/// - Refresh Token 쿠키 생성/조회
/// - Device-ID 헤더 추출
pub mod cookie;
pub mod device;

pub use cookie::*;
pub use device::*;
