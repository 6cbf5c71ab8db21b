//! 프롬프트 빌더 - 업무 능력 계층
//!
//! 부수 효과 없는 문자열 조립 함수들. 같은 입력이면 항상 같은 프롬프트가 나온다.

use crate::models::identity::StudentIdentity;

/// 메모가 비었을 때 넣는 문구
pub const EMPTY_NOTES_PLACEHOLDER: &str = "(담임 메모 없음)";

/// 보고서에 반드시 있어야 하는 절 제목
pub const REQUIRED_REPORT_SECTIONS: &[&str] = &[
    "1. 학생을 위한 한마디",
    "2. 컨설팅 종합 분석",
    "3. 대학 전공 추천",
    "4. 1학년 활동 문제점 및 보완 전략",
    "5. 추천 도서",
    "6-1. 창의적 체험활동#1 자율활동",
    "6-2. 창의적 체험활동#2 진로활동",
    "6-3. 창의적 체험활동#3 동아리활동",
    "6-4. 창의적 체험활동#4 봉사활동",
    "7. 2학년 교과별 전략",
    "8. 인성 및 행동특성 종합 의견",
];

/// `text` 에 없는 필수 절 제목 목록
pub fn missing_report_sections(text: &str) -> Vec<&'static str> {
    REQUIRED_REPORT_SECTIONS
        .iter()
        .copied()
        .filter(|section| !text.contains(section))
        .collect()
}

/// 보고서 목차와 절별 작성 지침
const REPORT_SECTION_GUIDE: &str = r#"[보고서 목차(반드시 포함)]
1. 학생을 위한 한마디 (감성적 격려와 총평)
2. 컨설팅 종합 분석 요약
3. 대학 전공 추천 (이유 포함)
4. 1학년 활동 문제점 및 보완 전략
5. 추천 도서 (고전 2권 + 전공 적합 도서 2~3권)
6. 창체 영역별 상세 컨설팅
  6-1. 창의적 체험활동#1 자율활동
  6-2. 창의적 체험활동#2 진로활동
  6-3. 창의적 체험활동#3 동아리활동
  6-4. 창의적 체험활동#4 봉사활동
7. 2학년 교과별 전략 / 수업 태도 개선 전략
8. 인성 및 행동특성 종합 의견

[절별 작성 지침]
--------------------------------
1. 학생을 위한 한마디
--------------------------------
- 학생 이름을 한 번 넣는다.
- 입력 전체를 아우르는 총평을 따뜻하고 감성적인 말로 전한다. 문학 작품이나 시 구절 인용을 권장한다.
- 한글 400자(약 1200바이트)를 넘지 않게 분량을 맞추되 문장이 중간에 끊기지 않게 완성한다.

--------------------------------
2. 컨설팅 종합 분석
--------------------------------
2-1. 학생부 스토리 전략: 핵심 키워드, 장점, 전공적합성, 성장 스토리를 3~5문장으로 요약한다.
2-2. '1학년 활동 종합 → 2학년 활동 컨설팅 → 3학년 활동 컨설팅' 흐름으로 정리한다.
     1학년에 이미 잡힌 방향, 2학년에 더하거나 심화할 활동, 3학년에 마무리할 포인트를 각각 쓴다.
2-3. 3년의 활동이 최종 진로 희망으로 이어지도록 하나의 학생부 스토리로 엮는다.
2-4. 자기평가서에 정보가 부족하거나 비어 있는 영역은 (🤖AI추천) 말머리를 달고 구체적인 활동을 제안한다.

--------------------------------
3. 대학 전공 추천
--------------------------------
3-1. 창체와 전체 내용을 분석해 전공을 1~3순위로 추천하고 순위마다 이유를 구체적으로 쓴다.
3-2. 학생이 희망 진로를 직접 적었다면 추천 전공과 어떻게 같고 다른지 비교·분석한다.

--------------------------------
4. 1학년 활동 문제점 및 보완 전략
--------------------------------
4-1. 학종 관점에서 본 1학년 활동의 문제점과 아쉬운 점을 짚는다.
4-2. 보완이 필요한 영역(전공연계성, 독서, 봉사, 심화탐구 등)마다 구체적인 대안을 낸다.
4-3. 제시하는 대안에는 모두 (🤖AI추천) 말머리를 단다.

--------------------------------
5. 추천 도서
--------------------------------
5-1. 1학년 보완용 고전: 학생의 특성을 고려한 고전 교양도서 2권과 추천 이유.
5-2. 전공 도서: 고1 수준의 전공 관련 교양서, 활동과 직접 연결되는 교양서와 참고서 2~3권과 각각의 추천 사유.
5-3. 2학년 추천 도서: 1학년 활동과 이어지면서 한 단계 높은 수준의 책 2~4권, 활동·전공과의 연결 이유를 짧게.

--------------------------------
6-1. 창의적 체험활동#1 자율활동
--------------------------------
- 활동 3~4개를 자기평가서에 나온 것부터 중요도 순으로 정리한다.
- 활동마다 '지적 호기심 발동(출발한 문제의식) → 탐구 활동(무엇을, 어떻게, 누구와) → 후속 활동/배운 점/성장' 구조로 쓴다.
- 활동마다 관련 도서 1~2권과 활동과의 연결 이유를 붙인다.
- 관련 내용이 부족하거나 없으면 (🤖AI추천) 말머리로 대체 활동을 제안한다.
- 진로활동, 동아리활동, 봉사활동, 교과 세특과 유기적으로 이어지게 설계한다.

--------------------------------
6-2. 창의적 체험활동#2 진로활동
--------------------------------
- 자율활동과 같은 활동 개수, 같은 서술 구조, 같은 방식의 추천 도서로 쓴다.
- 창체와 교과 세특이 한 줄기 스토리가 되도록 진로활동의 역할과 위치를 분명히 한다.

--------------------------------
6-3. 창의적 체험활동#3 동아리활동
--------------------------------
- 자율·진로활동과 같은 방식으로 쓰고 추천 도서를 제안한다.
- 동아리 활동이 창체 전체, 교과 세특, 희망 전공과 어떻게 이어지는지 설명한다.
- 관련 내용이 부족하면 (🤖AI추천) 말머리로 보완 활동을 제안한다.

--------------------------------
6-4. 창의적 체험활동#4 봉사활동
--------------------------------
- 내용이 없거나 매우 부족하면 (🤖AI추천) 말머리로 전공·인성과 이어지는 봉사활동을 제안한다.
- 내용이 있으면 다른 활동과 진로 목표에 연결해 의미를 다시 구성한다.
- 봉사활동도 창체 전체, 교과 세특과 하나의 스토리로 잇는다.

--------------------------------
7. 2학년 교과별 전략 / 수업 태도 개선 전략
--------------------------------
- 2학년 선택과목 정보가 없거나 부족하면 (🤖AI추천) 말머리로 전공과 이어지는 과목과 이유를 제안한다.
- 선택과목 중 3개를 골라 과목별 추천 활동을 쓴다.
- 과목마다 관련 도서(고전, 전공, 교양) 2~3권을 함께 제시한다.
- 집중력, 끈기, 성실함이 드러나는 수업 태도를 강조한다.

--------------------------------
8. 인성 및 행동특성 종합 의견
--------------------------------
- 위 자료를 모두 종합해 인성 영역을 분석하고 총평한다.
- 2~4개 문단으로 구성한다."#;

/// 1단계: 자기평가서(PDF)와 담임 메모로 컨설팅 보고서 작성
pub fn build_report_prompt(identity: &StudentIdentity, notes: &str) -> String {
    let notes_block = if notes.trim().is_empty() {
        EMPTY_NOTES_PLACEHOLDER
    } else {
        notes.trim()
    };

    format!(
        r#"당신은 경력 20년의 고등학교 진학지도교사입니다.
입력은 한 학생의 '자기평가서(PDF) 내용'과 담임교사의 '중요 메모(추가 기재사항)'입니다.
이 정보를 바탕으로 학생부종합전형(학종)에 맞는 진학 컨설팅 보고서를 작성하십시오.

[담임 메모(보고서에 직접 노출하지 말고 내용에만 반영)]
{notes_block}

[서식 규칙: 반드시 준수]
0) 출력은 순수 텍스트만. JSON, 코드블록, 설명문, 서론 금지.
1) 제목(헤딩)은 다음 세 형식만 허용하고, 아래 목차와 맞춰 만든다.
   - 1. 제목
   - 1-1. 제목
   - 1-1-1. 제목
2) 본문 안에서는 '1. 2. 3.' 같은 숫자 목록 금지.
   각 문단은 그 문단을 대표하는 키워드를 (말머리) 형태로 앞에 붙여 시작한다.
3) 전공 추천, 도서 추천, AI 제안 항목에는 번호를 쓰지 않는다.
   - 전공 추천 항목 앞: (🧑‍🎓🧬🔭AI추천) 을 굵은 빨간 글씨로
   - 도서 추천 항목 앞: (🔖AI추천) 을 굵은 빨간 글씨로
   - 그 밖의 AI 제안 앞: (🤖AI추천)
4) 최상위 헤딩(1. 단위)이 끝날 때마다 다음 토큰을 단독 한 줄로 넣는다.
   [[HR]]
   이 토큰은 문서에서 페이지 나눔으로 바뀌고 최종 문서에는 남지 않는다.
5) 문단 사이에는 빈 줄 1개(줄바꿈 2번).
6) 학생 이름은 "{name}". 호칭은 '학생' 또는 학생 이름으로 통일.
7) 존댓말. 과한 미화 금지. 구체적인 실행 중심.
8) 모든 말머리는 굵은 빨간 글씨로 쓴다.

{sections}

[마지막 주의사항]
- 학생을 비현실적으로 미화하지 말고, 자기평가서 내용과 어긋나지 않게 구체적으로 보완·제안할 것.
- 전체 문장은 매끄럽고 전문적인 존댓말로 작성할 것."#,
        notes_block = notes_block,
        name = identity.name(),
        sections = REPORT_SECTION_GUIDE,
    )
}

/// 보고서가 중간에 끊겼을 때 누락된 절만 이어서 쓰게 하는 프롬프트
pub fn build_continuation_prompt(missing_sections: &[&str], report: &str) -> String {
    format!(
        r#"아래 보고서는 중간에 끊겼습니다.
누락된 항목만 이어서 작성하십시오.
이미 작성된 내용은 반복하지 말고, 다음 항목부터 계속 작성하세요.

누락 항목:
{missing}

[기존 보고서]
{report}"#,
        missing = missing_sections.join(", "),
        report = report,
    )
}

/// 2단계: 담임교사용 요약
pub fn build_summary_prompt(report: &str) -> String {
    format!(
        r#"아래 컨설팅 보고서를 담임교사가 빠르게 파악할 수 있도록 요약하십시오.

[요약 규칙]
- 핵심만, 과장 없이
- 강점 5개 / 보완점 5개 / 즉시 실행 5개
- 마지막에 "학생부 스토리 한 문장"
- Markdown
- 목록은 하이픈(-)만 사용 (숫자 목록 금지)

[원문]
{report}"#
    )
}

/// 3단계: 담임교사 내부 지도방침
pub fn build_guidance_prompt(report: &str, summary: &str) -> String {
    format!(
        r#"학생의 전체 컨설팅 결과를 토대로, 담임교사가 학생을 지도할 때 기울여야 할 지도 방침을 작성하십시오.
컨설팅 보고서 요약 + 지도 조언 + 담임선생님을 향한 따뜻하고 공감 어린 격려를 함께 담으십시오.
9000바이트(한글 3000자 내외) 안에서 완결감 있게 작성하고, 문장 중간에서 끊지 말고 반드시 맺음말로 끝내십시오.

[작성 방향]
- 창체-교과-독서-인성이 서로 맞물리는 하나의 이야기로 엮어 서술
- 무리한 미화 없이, 실제 담임교사가 공감할 수 있는 현실적인 어조
- 강점은 어떻게 더 살릴지, 보완점은 어떤 방향으로 지도할지 구체적으로 제시

[내용 구성 권장]
- 학생 전체 흐름에 대한 담임 관점의 종합 해석
- 교과·비교과·독서·인성이 맞물리는 지도 포인트
- 진로·진학 지도 시 특히 유의할 점
- 담임교사를 향한 공감과 응원의 말

[주의]
- 학생에게 직접 말하는 글이 아니라 '담임교사를 위한 내부 지도 문서'로 작성
- 훈계조, 평가조 문체는 피할 것

[요약]
{summary}

[원문]
{report}

[출력 규칙]
- Markdown
- 목록은 하이픈(-)만 사용 (숫자 목록 금지)"#
    )
}
