//! 문서 모델
//!
//! 템플릿 복사본과 플레이스홀더 치환 규칙

/// 생성된 문서
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub id: String,
    pub title: String,
    pub url: String,
}

impl DocumentRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let id = id.into();
        let url = document_url(&id);
        Self {
            id,
            title: title.into(),
            url,
        }
    }
}

/// 문서 편집 URL
pub fn document_url(doc_id: &str) -> String {
    format!("https://docs.google.com/document/d/{}/edit", doc_id)
}

/// 토큰 → 치환값 매핑
///
/// 치환은 대소문자를 구분하는 문자 그대로의 일치이며 모든 출현을 바꾼다.
/// 요청은 추가한 순서대로 한 번의 배치로 전송된다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    entries: Vec<(String, String)>,
}

impl PlaceholderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 같은 토큰을 다시 넣으면 값만 바뀐다
    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) {
        let token = token.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((token, value)),
        }
    }

    pub fn with(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(token, value);
        self
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 템플릿에 있어야 하는 플레이스홀더와 그 표시 라벨
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub token: &'static str,
    pub label: &'static str,
}

pub const STUDENT_NAME: &str = "{{STUDENT_NAME}}";
pub const STUDENT_NUM: &str = "{{STUDENT_NUM}}";
pub const REPORT_CONTENT: &str = "{{REPORT_CONTENT}}";
pub const REPORT_SUMMARY: &str = "{{REPORT_SUMMARY}}";
pub const HOMEROOM_GUIDANCE: &str = "{{HOMEROOM_GUIDANCE}}";
pub const NOTES_BLOCK: &str = "{{NOTES_BLOCK}}";

/// 보고서 템플릿 플레이스홀더
pub const REPORT_PLACEHOLDERS: &[Placeholder] = &[
    Placeholder {
        token: REPORT_CONTENT,
        label: "컨설팅 보고서(원문)",
    },
    Placeholder {
        token: REPORT_SUMMARY,
        label: "컨설팅 보고서 요약",
    },
    Placeholder {
        token: STUDENT_NAME,
        label: "학생 이름",
    },
    Placeholder {
        token: STUDENT_NUM,
        label: "학번",
    },
];

/// 지도방침 템플릿 플레이스홀더
pub const GUIDANCE_PLACEHOLDERS: &[Placeholder] = &[
    Placeholder {
        token: HOMEROOM_GUIDANCE,
        label: "담임교사용 진학지도 조언",
    },
    Placeholder {
        token: REPORT_SUMMARY,
        label: "학생 컨설팅 보고서 요약본",
    },
    Placeholder {
        token: STUDENT_NAME,
        label: "학생 이름",
    },
    Placeholder {
        token: STUDENT_NUM,
        label: "학번",
    },
    Placeholder {
        token: NOTES_BLOCK,
        label: "담임 추가 기재사항",
    },
];

/// 서식 적용 뒤 지우는 구조/디버그 토큰
pub const DEBUG_TOKENS: &[&str] = &[
    "[[HR]]",
    "=== 본문 시작 ===",
    "{{REPORT_ANCHOR}}",
    "{{GUIDE_ANCHOR}}",
    "[[NOTES_START]]",
    "[[NOTES_END]]",
];
