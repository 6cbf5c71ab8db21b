//! 학생 식별 정보
//!
//! 학번 5자리(학년 1 + 반 2 + 번호 2)와 이름

use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9]").expect("valid regex"));

/// 학번에서 숫자만 남기고 앞 5자리를 돌려준다
///
/// 학년은 0 일 수 없으므로 앞쪽 0 은 버린다 (`010-201` → `10201`).
/// 남은 숫자가 5자리 미만이면 빈 문자열.
pub fn normalize_code(raw: &str) -> String {
    let digits = NON_DIGIT.replace_all(raw.trim(), "");
    let digits = digits.trim_start_matches('0');
    if digits.chars().count() >= 5 {
        digits.chars().take(5).collect()
    } else {
        String::new()
    }
}

/// 5자리 학번을 (학년, 반, 번호) 로 분해
///
/// 반/번호의 앞자리 0 은 떨어진다. 형식이 맞지 않으면 모두 빈 문자열.
pub fn decompose_code(code: &str) -> (String, String, String) {
    if code.len() != 5 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return (String::new(), String::new(), String::new());
    }
    let grade = code[0..1].to_string();
    let class = strip_leading_zeros(&code[1..3]);
    let number = strip_leading_zeros(&code[3..5]);
    (grade, class, number)
}

fn strip_leading_zeros(s: &str) -> String {
    let trimmed = s.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// 학생 식별 정보 (생성 후 불변)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentIdentity {
    code: String,
    name: String,
    grade: String,
    class: String,
    number: String,
}

impl StudentIdentity {
    /// 사용자 입력으로부터 생성
    pub fn parse(raw_code: &str, raw_name: &str) -> Result<Self, ValidationError> {
        let code = normalize_code(raw_code);
        if code.is_empty() {
            return Err(ValidationError::InvalidStudentCode);
        }
        let name = raw_name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        let (grade, class, number) = decompose_code(&code);
        Ok(Self {
            code,
            name: name.to_string(),
            grade,
            class,
            number,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grade(&self) -> &str {
        &self.grade
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    /// 보고서 문서 제목: `{학번}_{이름}`
    pub fn report_title(&self) -> String {
        format!("{}_{}", self.code, self.name)
    }

    /// 지도방침 문서 제목: `{학번}_{이름}_담임교사지도방침`
    pub fn guidance_title(&self) -> String {
        format!("{}_담임교사지도방침", self.report_title())
    }
}

impl Display for StudentIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[학번 {} {}]", self.code, self.name)
    }
}
