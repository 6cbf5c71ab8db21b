//! 오류 타입
//!
//! 단계별로 구분된 오류 계층. 최상위 `AppError` 는 어느 단계에서 실패했는지를
//! 메시지에 그대로 담는다.

use thiserror::Error;

use crate::models::stage::StageKind;

/// 입력 검증 오류 (원격 호출 전에 거부)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// 학번이 숫자 5자리가 아님
    #[error("학번은 숫자 5자리로 입력하세요. (예: 10201)")]
    InvalidStudentCode,
    /// 학생 이름 누락
    #[error("학생 이름을 입력하세요.")]
    MissingName,
    /// PDF 누락 또는 빈 파일
    #[error("PDF를 업로드하세요.")]
    MissingPdf,
    /// 접근 코드 불일치
    #[error("접근이 제한된 버전입니다. 테스터 코드를 확인하세요.")]
    AccessDenied,
    /// 요청 빈도 제한
    #[error("요청이 너무 많습니다. {wait_secs}초 후 다시 시도하세요.")]
    RateLimited { wait_secs: u64 },
}

/// 생성 모델 호출 오류
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 응답 텍스트가 비어 있음
    #[error("모델 {model} 응답이 비었습니다")]
    EmptyResponse { model: String },
    /// API 호출 실패
    #[error("모델 {model} 호출 실패: {message}")]
    Api { model: String, message: String },
    /// 요청 구성 실패
    #[error("요청 구성 실패: {0}")]
    Request(String),
}

/// 문서/시트 저장소 호출 오류
#[derive(Debug, Error)]
pub enum RemoteStoreError {
    /// HTTP 상태 코드 오류
    #[error("{endpoint} HTTP {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// 네트워크 전송 실패
    #[error("{endpoint} 요청 실패: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 응답 형식이 예상과 다름
    #[error("{endpoint} 응답 형식 오류: {message}")]
    BadResponse { endpoint: String, message: String },
    /// HTTP 클라이언트 생성 실패
    #[error("HTTP 클라이언트 생성 실패: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl RemoteStoreError {
    /// 재시도 판정에 쓰는 HTTP 상태 코드
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteStoreError::Status { status, .. } => Some(*status),
            RemoteStoreError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            RemoteStoreError::BadResponse { .. } | RemoteStoreError::ClientBuild(_) => None,
        }
    }
}

/// 서식 웹훅 오류 (항상 경고로만 처리)
#[derive(Debug, Error)]
pub enum FormatHookError {
    #[error("HTTP {0}")]
    Status(u16),
    #[error("JSON 이 아닌 응답: {0}")]
    NonJson(String),
    #[error("서식 적용 응답 ok=false")]
    NotOk,
    #[error("요청 실패: {0}")]
    Transport(#[from] reqwest::Error),
}

/// 설정 오류
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 필수 환경 변수 누락
    #[error("환경 변수 {var_name} 가 설정되지 않았습니다")]
    Missing { var_name: String },
    /// 환경 변수 값 해석 실패
    #[error("환경 변수 {var_name} 해석 실패: 값 '{value}' 를 {expected_type} 로 변환할 수 없습니다")]
    Invalid {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

/// 애플리케이션 오류
#[derive(Debug, Error)]
pub enum AppError {
    #[error("입력 오류: {0}")]
    Validation(#[from] ValidationError),
    #[error("{stage} 실패: {source}")]
    Stage {
        stage: StageKind,
        #[source]
        source: GenerationError,
    },
    #[error("문서 생성 실패: {0}")]
    Document(#[source] RemoteStoreError),
    #[error("시트 기록 실패: {0}")]
    Ledger(#[source] RemoteStoreError),
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    #[error("파일 오류 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML 해석 실패 ({path}): {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl AppError {
    /// 생성 단계 오류
    pub fn stage(stage: StageKind, source: GenerationError) -> Self {
        AppError::Stage { stage, source }
    }

    /// 파일 읽기 오류
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }

    /// 실패한 생성 단계 (해당될 때만)
    pub fn failed_stage(&self) -> Option<StageKind> {
        match self {
            AppError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// 애플리케이션 결과 타입
pub type AppResult<T> = Result<T, AppError>;
