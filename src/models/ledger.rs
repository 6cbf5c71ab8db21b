//! 시트 기록 행

use crate::models::document::DocumentRecord;
use crate::models::identity::StudentIdentity;

/// 보고서 링크 표시 문구
pub const REPORT_LINK_LABEL: &str = "컨설팅 보고서";
/// 지도방침 링크 표시 문구
pub const GUIDANCE_LINK_LABEL: &str = "조언";

/// 스프레드시트 하이퍼링크 수식
///
/// URL 이 비어 있으면 빈 칸. 큰따옴표는 두 번 써서 이스케이프한다.
pub fn hyperlink_formula(url: &str, label: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }
    format!(
        "=HYPERLINK(\"{}\",\"{}\")",
        url.replace('"', "\"\""),
        label.replace('"', "\"\"")
    )
}

/// 시트에 쓰는 한 행 (A~G, H 열 생성 시각은 기록 시점에 붙는다)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub grade: String,
    pub class: String,
    pub number: String,
    pub code: String,
    pub name: String,
    pub report_link: String,
    pub guidance_link: String,
}

impl LedgerRow {
    pub fn new(
        identity: &StudentIdentity,
        report: &DocumentRecord,
        guidance: &DocumentRecord,
    ) -> Self {
        Self {
            grade: identity.grade().to_string(),
            class: identity.class().to_string(),
            number: identity.number().to_string(),
            code: identity.code().to_string(),
            name: identity.name().to_string(),
            report_link: hyperlink_formula(&report.url, REPORT_LINK_LABEL),
            guidance_link: hyperlink_formula(&guidance.url, GUIDANCE_LINK_LABEL),
        }
    }

    /// A~G 7개 값
    pub fn values(&self) -> Vec<String> {
        vec![
            self.grade.clone(),
            self.class.clone(),
            self.number.clone(),
            self.code.clone(),
            self.name.clone(),
            self.report_link.clone(),
            self.guidance_link.clone(),
        ]
    }
}
