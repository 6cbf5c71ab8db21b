//! 제출 데이터
//!
//! `Submission` 은 사용자가 입력한 그대로의 값, `GenerationRequest` 는 검증을 통과한 값이다.

use serde::Deserialize;

use crate::error::ValidationError;
use crate::models::identity::StudentIdentity;

/// 제출 TOML 파일 한 개
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    /// 학번 (예: 10201, 하이픈 등은 무시)
    pub student_code: String,
    pub student_name: String,
    /// TOML 파일 기준 상대 경로
    pub pdf_path: String,
    /// 담임교사 추가 기재사항
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub access_code: Option<String>,
    /// 요청 빈도 제한 키 (없으면 학번)
    #[serde(default)]
    pub session: Option<String>,

    /// 로더가 채우는 값
    #[serde(skip)]
    pub pdf_bytes: Vec<u8>,
    #[serde(skip)]
    pub file_path: Option<String>,
}

impl Submission {
    /// 검증 후 생성 요청으로 변환
    ///
    /// 학번 → 이름 → PDF 순서로 확인한다.
    pub fn validate(&self) -> Result<GenerationRequest, ValidationError> {
        let identity = StudentIdentity::parse(&self.student_code, &self.student_name)?;
        if self.pdf_bytes.is_empty() {
            return Err(ValidationError::MissingPdf);
        }
        Ok(GenerationRequest {
            identity,
            notes: self.notes.clone(),
            pdf_bytes: self.pdf_bytes.clone(),
        })
    }

    /// 빈도 제한 키
    pub fn session_key(&self) -> String {
        match &self.session {
            Some(session) if !session.trim().is_empty() => session.trim().to_string(),
            _ => format!("student:{}", self.student_code.trim()),
        }
    }

    /// 로그 표시용 라벨
    pub fn label(&self) -> String {
        self.file_path
            .clone()
            .unwrap_or_else(|| format!("{}_{}", self.student_code.trim(), self.student_name.trim()))
    }
}

/// 검증을 통과한 생성 요청
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub identity: StudentIdentity,
    /// 비어 있을 수 있다
    pub notes: String,
    /// 비어 있지 않음
    pub pdf_bytes: Vec<u8>,
}
