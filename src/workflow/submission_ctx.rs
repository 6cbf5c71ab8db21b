//! 제출 처리 컨텍스트
//!
//! "지금 몇 번째 제출을, 어떤 세션으로 처리 중인가" 를 담는다.

use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct SubmissionCtx {
    /// 빈도 제한 키
    pub session: String,

    /// 제출 순번 (1부터, 로그 표시용)
    pub index: usize,

    pub total: usize,
}

impl SubmissionCtx {
    pub fn new(session: impl Into<String>, index: usize, total: usize) -> Self {
        Self {
            session: session.into(),
            index,
            total,
        }
    }
}

impl Display for SubmissionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[제출 {}/{} 세션#{}]", self.index, self.total, self.session)
    }
}
