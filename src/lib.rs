// Forum server library: 인증/세션 코어
pub mod domains;
pub mod openapi;
pub mod routes;
pub mod shared;
