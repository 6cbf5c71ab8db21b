//! 편성 계층
//!
//! ## 모듈
//!
//! ### `batch_processor` - 일괄 처리기
//! - 클라이언트를 한 번만 만들고 수명 관리
//! - 제출 TOML 파일 일괄 로드
//! - 제출을 하나씩 순서대로 처리
//! - 실행 로그와 전체 통계
//!
//! ### `submission_processor` - 단일 제출 처리기
//! - 검증 (빈도 제한, 접근 코드, 입력)
//! - 생성 흐름 실행
//! - 문서 두 개 생성 후 시트 기록
//!
//! ## 계층 관계
//!
//! ```text
//! batch_processor (Vec<Submission>)
//!     ↓
//! submission_processor (Submission 한 건)
//!     ↓
//! workflow::GenerationFlow (세 단계 생성)
//!     ↓
//! services (생성 / 프롬프트 / 후처리 / 문서 / 시트)
//!     ↓
//! infrastructure (재시도, 빈도 제한) + clients (원격 API)
//! ```

pub mod batch_processor;
pub mod submission_processor;

pub use batch_processor::{App, ProcessingStats};
pub use submission_processor::{
    Collaborators, ProcessorSettings, SubmissionOutcome, SubmissionProcessor,
};
