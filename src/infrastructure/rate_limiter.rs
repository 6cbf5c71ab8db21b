//! 요청 빈도 제한
//!
//! 세션 키마다 최근 요청 시각을 보관하고, 창(window) 밖으로 나간 기록은 지운다.
//! 공유 시트의 행 경쟁을 막는 장치는 아니다.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::ValidationError;

/// 키별 슬라이딩 윈도우 제한기
#[derive(Debug)]
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    history: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    /// `limit` 이 0 이면 제한하지 않는다
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            history: Mutex::new(HashMap::new()),
        }
    }

    pub fn check(&self, key: &str) -> Result<(), ValidationError> {
        self.check_at(key, Instant::now())
    }

    /// `now` 시점에 요청 하나를 기록할 수 있는지 확인하고, 가능하면 기록한다
    pub fn check_at(&self, key: &str, now: Instant) -> Result<(), ValidationError> {
        if self.limit == 0 {
            return Ok(());
        }

        let mut history = self
            .history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let window = self.window;
        history.retain(|_, stamps| {
            while let Some(front) = stamps.front() {
                if now.saturating_duration_since(*front) >= window {
                    stamps.pop_front();
                } else {
                    break;
                }
            }
            !stamps.is_empty()
        });

        let stamps = history.entry(key.to_string()).or_default();
        if stamps.len() >= self.limit {
            let oldest = stamps.front().copied().unwrap_or(now);
            let remaining = window.saturating_sub(now.saturating_duration_since(oldest));
            return Err(ValidationError::RateLimited {
                wait_secs: remaining.as_secs() + 1,
            });
        }

        stamps.push_back(now);
        Ok(())
    }

    /// 기록이 남아 있는 키 수
    pub fn tracked_keys(&self) -> usize {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
