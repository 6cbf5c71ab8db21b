//! # Consulting Report
//!
//! 학생 자기평가서(PDF)와 담임 메모로 학생부 컨설팅 보고서를 만들고,
//! Google Docs 문서 두 개와 Google Sheets 기록 한 행으로 남기는 애플리케이션
//!
//! ## 구조
//!
//! ### ① 기반 계층 (Infrastructure)
//! - `infrastructure/` - 업무를 모르는 재사용 장치
//! - `execute_with_retry` - 오류 분류에 따른 지수 백오프 재시도
//! - `RateLimiter` - 세션별 요청 빈도 제한
//!
//! ### ② 원격 클라이언트 (Clients)
//! - `clients/` - 생성 모델, Drive/Docs, Sheets, 서식 웹훅
//!
//! ### ③ 업무 능력 계층 (Services)
//! - `LlmService` - 재시도를 포함한 생성 호출
//! - `prompts` - 세 단계 프롬프트
//! - `text_sanitizer` - 숫자 목록 정리, 바이트 예산 자르기
//! - `DocumentService` - 템플릿 복사와 플레이스홀더 치환
//! - `LedgerWriter` - 첫 빈 행 찾아 기록
//!
//! ### ④ 흐름 계층 (Workflow)
//! - `GenerationFlow` - 보고서 → 요약 → 지도방침
//! - `SubmissionCtx` - 처리 중인 제출 정보
//!
//! ### ⑤ 편성 계층 (Orchestration)
//! - `orchestrator/batch_processor` - 제출 폴더 일괄 처리
//! - `orchestrator/submission_processor` - 제출 한 건 처리

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 자주 쓰는 타입
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{StudentIdentity, Submission};
pub use orchestrator::{App, SubmissionProcessor};
pub use workflow::{GenerationFlow, SubmissionCtx};
