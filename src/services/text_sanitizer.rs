//! 생성 텍스트 후처리 - 업무 능력 계층
//!
//! 세 가지 독립된 처리:
//! - 헤딩 판별 (`1.`, `1-1.`, `1-1-1.` 형식의 짧은 제목 줄은 보호)
//! - 본문 숫자 목록을 하이픈 목록으로 변환
//! - UTF-8 바이트 예산 안에서 안전하게 자르기

use std::sync::LazyLock;

use regex::Regex;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(-\d+){0,2}\.\s+\S+").expect("valid regex"));
static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+").expect("valid regex"));

/// 헤딩으로 인정하는 최대 글자 수
pub const MAX_HEADING_CHARS: usize = 40;

/// 목록 기호
pub const BULLET: &str = "- ";

/// 헤딩 줄 판별
///
/// 번호 형식으로 시작하고, 40자 이하이며, 문장 끝 표지(`.`)로 끝나지 않아야 한다.
pub fn is_heading_line(line: &str) -> bool {
    let s = line.trim();
    HEADING.is_match(s)
        && s.chars().count() <= MAX_HEADING_CHARS
        && !(s.ends_with("다.") || s.ends_with("요.") || s.ends_with('.'))
}

/// 헤딩이 아닌 `N. ` 숫자 목록 줄을 하이픈 목록으로 바꾼다
///
/// 헤딩은 앞뒤 공백만 정리해서 그대로 두고, 나머지 줄은 건드리지 않는다.
/// 두 번 적용해도 결과가 같다.
pub fn flatten_numbered_lists(text: &str) -> String {
    text.lines()
        .map(|line| {
            let stripped = line.trim();
            if is_heading_line(stripped) {
                return stripped.to_string();
            }
            match NUMBERED_ITEM.find(stripped) {
                Some(prefix) => format!("{}{}", BULLET, stripped[prefix.end()..].trim()),
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// UTF-8 바이트 예산 안으로 자르기
///
/// 이미 예산 안이면 그대로 돌려준다. 넘치면 예산 경계에서 자르고, 끝에 걸린
/// 불완전한 멀티바이트 문자는 버린 뒤 앞뒤 공백을 정리한다.
pub fn trim_to_utf8_budget(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].trim().to_string()
}
