//! 기반 계층
//!
//! 특정 업무를 모르는 재사용 장치: 재시도 실행기와 요청 빈도 제한기

pub mod rate_limiter;
pub mod retry;

pub use rate_limiter::RateLimiter;
pub use retry::{
    classify_generation_error, classify_store_error, execute_with_retry, ErrorClass, RetryPolicy,
};
