//! 재시도 실행기 - 기반 계층
//!
//! 원격 호출 하나를 감싸고, 오류 분류 결과에 따라 지수 백오프 후 재시도하거나
//! 원래 오류를 그대로 돌려준다. 생성 모델, 문서 저장소, 시트 저장소 세 곳이
//! 같은 실행기를 쓰고 분류 함수만 다르다.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::error::{GenerationError, RemoteStoreError};

/// 오류 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// 시간을 두고 다시 시도할 수 있음
    Retryable,
    /// 즉시 실패
    Fatal,
}

/// 지터 배율 범위 `[0.6, 1.4]`
pub const JITTER_MIN: f64 = 0.6;
pub const JITTER_MAX: f64 = 1.4;

/// 재시도 정책
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 최초 호출을 포함한 총 시도 횟수
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// 대기 없이 재시도하는 정책
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// `min(cap, base * 2^attempt)` (attempt 는 0 부터)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// 지터를 곱한 실제 대기 시간
    pub fn jittered_backoff(&self, attempt: u32) -> Duration {
        let jitter = rand::thread_rng().gen_range(JITTER_MIN..=JITTER_MAX);
        self.backoff(attempt).mul_f64(jitter)
    }
}

/// 분류 함수에 따라 재시도하며 `operation` 을 실행
///
/// 재시도할 때마다 경고 로그를 남긴다. 시도 횟수를 다 쓰거나 Fatal 로
/// 분류되면 마지막 오류를 바꾸지 않고 돌려준다.
pub async fn execute_with_retry<T, E, F, Fut, C>(
    policy: &RetryPolicy,
    label: &str,
    classify: C,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> ErrorClass,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let retryable = classify(&err) == ErrorClass::Retryable;
                if !retryable || attempt + 1 >= max_attempts {
                    return Err(err);
                }

                let delay = policy.jittered_backoff(attempt);
                warn!(
                    "⚠️ {} 재시도 ({}/{}): {} ({:.1}초 대기)",
                    label,
                    attempt + 1,
                    max_attempts,
                    err,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// 생성 모델 오류 중 일시적인 것으로 보는 표지
pub const TRANSIENT_GENERATION_MARKERS: &[&str] = &[
    "429",
    "rate",
    "quota",
    "resource exhausted",
    "503",
    "overload",
    "unavailable",
    "504",
    "deadline",
    "timeout",
];

/// 생성 모델 오류 분류
///
/// 빈 응답은 재시도 대상이다. API 오류는 메시지에 일시적 표지가 있을 때만 재시도한다.
pub fn classify_generation_error(err: &GenerationError) -> ErrorClass {
    match err {
        GenerationError::EmptyResponse { .. } => ErrorClass::Retryable,
        GenerationError::Api { message, .. } => {
            let lowered = message.to_lowercase();
            if TRANSIENT_GENERATION_MARKERS
                .iter()
                .any(|marker| lowered.contains(marker))
            {
                ErrorClass::Retryable
            } else {
                ErrorClass::Fatal
            }
        }
        GenerationError::Request(_) => ErrorClass::Fatal,
    }
}

/// 서버/과부하 상태 코드
pub const RETRYABLE_STATUS_CODES: &[u16] = &[429, 500, 502, 503, 504];

/// 문서/시트 저장소 오류 분류
pub fn classify_store_error(err: &RemoteStoreError) -> ErrorClass {
    match err.status() {
        Some(status) if RETRYABLE_STATUS_CODES.contains(&status) => ErrorClass::Retryable,
        _ => ErrorClass::Fatal,
    }
}
