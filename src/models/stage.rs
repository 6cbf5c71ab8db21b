//! 생성 단계 모델

use std::fmt::Display;

/// 생성 단계 (보고서 → 요약 → 지도방침 순서로 실행)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// 1단계: 컨설팅 보고서
    Report,
    /// 2단계: 보고서 요약
    Summary,
    /// 3단계: 담임교사용 지도방침
    Guidance,
}

impl StageKind {
    /// 실행 순서
    pub const ALL: [StageKind; 3] = [StageKind::Report, StageKind::Summary, StageKind::Guidance];

    /// 표시용 이름
    pub fn label(self) -> &'static str {
        match self {
            StageKind::Report => "1단계(컨설팅 보고서)",
            StageKind::Summary => "2단계(보고서 요약)",
            StageKind::Guidance => "3단계(담임교사 지도방침)",
        }
    }
}

impl Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 단계 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    Pending,
    InProgress,
    Done,
    Failed,
}

/// 한 단계의 결과 텍스트
///
/// 후처리가 끝난 뒤에는 바뀌지 않는다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput {
    pub stage: StageKind,
    pub text: String,
}

impl StageOutput {
    pub fn new(stage: StageKind, text: impl Into<String>) -> Self {
        Self {
            stage,
            text: text.into(),
        }
    }
}

/// 세 단계의 결과 묶음
#[derive(Debug, Clone)]
pub struct GenerationOutputs {
    pub report: StageOutput,
    pub summary: StageOutput,
    pub guidance: StageOutput,
}
