//! 생성 흐름 - 흐름 계층
//!
//! 한 학생의 세 단계 생성을 순서대로 실행한다.
//!
//! 1. 보고서 (PDF 첨부) → 누락 절 보완 1회 → 숫자 목록 정리
//! 2. 요약 → 숫자 목록 정리
//! 3. 지도방침 → 바이트 예산 자르기 → 숫자 목록 정리
//!
//! 한 단계가 실패하면 뒤 단계는 실행하지 않고, 어느 단계인지 담은 오류를 돌려준다.

use std::fmt::Display;

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, GenerationError};
use crate::models::stage::{GenerationOutputs, StageKind, StageOutput, StageState};
use crate::models::submission::GenerationRequest;
use crate::services::prompts::{
    build_continuation_prompt, build_guidance_prompt, build_report_prompt, build_summary_prompt,
    missing_report_sections,
};
use crate::services::text_sanitizer::{flatten_numbered_lists, trim_to_utf8_budget};
use crate::services::LlmService;
use crate::utils::logging::truncate_text;
use crate::workflow::submission_ctx::SubmissionCtx;

/// 단계별 모델과 지도방침 바이트 예산
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    pub model_report: String,
    pub model_summary: String,
    pub model_guide: String,
    pub guidance_max_bytes: usize,
}

impl GenerationSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model_report: config.model_report.clone(),
            model_summary: config.model_summary.clone(),
            model_guide: config.model_guide.clone(),
            guidance_max_bytes: config.guidance_max_bytes,
        }
    }
}

/// 단계 상태 추적기
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTracker {
    states: [StageState; 3],
}

impl Default for StageTracker {
    fn default() -> Self {
        Self {
            states: [StageState::Pending; 3],
        }
    }
}

impl StageTracker {
    fn slot(stage: StageKind) -> usize {
        match stage {
            StageKind::Report => 0,
            StageKind::Summary => 1,
            StageKind::Guidance => 2,
        }
    }

    pub fn state(&self, stage: StageKind) -> StageState {
        self.states[Self::slot(stage)]
    }

    fn set(&mut self, stage: StageKind, state: StageState) {
        self.states[Self::slot(stage)] = state;
    }

    /// 모든 단계가 Done
    pub fn is_complete(&self) -> bool {
        StageKind::ALL
            .iter()
            .all(|stage| self.state(*stage) == StageState::Done)
    }
}

impl Display for StageTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let states: Vec<String> = StageKind::ALL
            .iter()
            .map(|stage| format!("{}={:?}", stage, self.state(*stage)))
            .collect();
        f.write_str(&states.join(", "))
    }
}

/// 생성 흐름
///
/// - 단계 순서와 후처리 규칙을 정한다
/// - 재시도는 `LlmService` 가 맡는다
/// - 문서나 시트는 모른다
pub struct GenerationFlow {
    llm: LlmService,
    settings: GenerationSettings,
}

impl GenerationFlow {
    pub fn new(llm: LlmService, settings: GenerationSettings) -> Self {
        Self { llm, settings }
    }

    pub async fn run(
        &self,
        ctx: &SubmissionCtx,
        request: &GenerationRequest,
    ) -> AppResult<GenerationOutputs> {
        let mut tracker = StageTracker::default();
        self.run_tracked(ctx, request, &mut tracker).await
    }

    /// 상태 추적기를 밖에서 넘겨받아 실행
    pub async fn run_tracked(
        &self,
        ctx: &SubmissionCtx,
        request: &GenerationRequest,
        tracker: &mut StageTracker,
    ) -> AppResult<GenerationOutputs> {
        let report = self
            .stage(ctx, tracker, StageKind::Report, self.generate_report(request))
            .await?;
        let summary = self
            .stage(ctx, tracker, StageKind::Summary, self.generate_summary(&report.text))
            .await?;
        let guidance = self
            .stage(
                ctx,
                tracker,
                StageKind::Guidance,
                self.generate_guidance(&report.text, &summary.text),
            )
            .await?;

        Ok(GenerationOutputs {
            report,
            summary,
            guidance,
        })
    }

    async fn stage<F>(
        &self,
        ctx: &SubmissionCtx,
        tracker: &mut StageTracker,
        stage: StageKind,
        work: F,
    ) -> AppResult<StageOutput>
    where
        F: std::future::Future<Output = Result<String, GenerationError>>,
    {
        tracker.set(stage, StageState::InProgress);
        info!("{} ⏳ {} 생성 중...", ctx, stage);

        match work.await {
            Ok(text) => {
                tracker.set(stage, StageState::Done);
                info!("{} ✅ {} 완료 ({} 바이트)", ctx, stage, text.len());
                debug!("{} {} 미리보기: {}", ctx, stage, truncate_text(text.trim(), 80));
                Ok(StageOutput::new(stage, text))
            }
            Err(e) => {
                tracker.set(stage, StageState::Failed);
                error!("{} ❌ {} 실패: {} [{}]", ctx, stage, e, tracker);
                Err(AppError::stage(stage, e))
            }
        }
    }

    async fn generate_report(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let prompt = build_report_prompt(&request.identity, &request.notes);
        let report = self
            .llm
            .generate(&self.settings.model_report, &prompt, Some(&request.pdf_bytes))
            .await?;
        let report = self.complete_report(report).await?;
        Ok(flatten_numbered_lists(&report))
    }

    /// 필수 절이 빠졌으면 이어쓰기를 한 번만 요청해 뒤에 붙인다
    ///
    /// 이어쓴 뒤에도 빠진 절이 있으면 그대로 받아들인다.
    pub async fn complete_report(&self, report: String) -> Result<String, GenerationError> {
        let missing = missing_report_sections(&report);
        if missing.is_empty() {
            return Ok(report);
        }

        warn!(
            "보고서에 빠진 절 {}개, 이어쓰기 요청: {}",
            missing.len(),
            missing.join(", ")
        );
        let prompt = build_continuation_prompt(&missing, &report);
        let continuation = self
            .llm
            .generate(&self.settings.model_report, &prompt, None)
            .await?;

        Ok(format!("{}\n\n{}", report.trim(), continuation.trim()))
    }

    async fn generate_summary(&self, report: &str) -> Result<String, GenerationError> {
        let prompt = build_summary_prompt(report);
        let summary = self
            .llm
            .generate(&self.settings.model_summary, &prompt, None)
            .await?;
        Ok(flatten_numbered_lists(&summary))
    }

    async fn generate_guidance(&self, report: &str, summary: &str) -> Result<String, GenerationError> {
        let prompt = build_guidance_prompt(report, summary);
        let guidance = self
            .llm
            .generate(&self.settings.model_guide, &prompt, None)
            .await?;
        let guidance = trim_to_utf8_budget(&guidance, self.settings.guidance_max_bytes);
        Ok(flatten_numbered_lists(&guidance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::llm_client::{GenerationCall, TextGenerator};
    use crate::infrastructure::retry::RetryPolicy;
    use crate::models::identity::StudentIdentity;
    use crate::services::prompts::REQUIRED_REPORT_SECTIONS;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// 순서대로 응답하는 생성기
    struct QueueGenerator {
        replies: Mutex<VecDeque<Result<String, GenerationError>>>,
        calls: Mutex<Vec<GenerationCall>>,
    }

    impl QueueGenerator {
        fn new(replies: Vec<Result<String, GenerationError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<GenerationCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for QueueGenerator {
        async fn generate(&self, call: &GenerationCall) -> Result<String, GenerationError> {
            self.calls.lock().unwrap().push(call.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("추가 응답".to_string()))
        }
    }

    fn settings() -> GenerationSettings {
        GenerationSettings {
            model_report: "model-a-pro".to_string(),
            model_summary: "model-b-flash".to_string(),
            model_guide: "model-a-pro".to_string(),
            guidance_max_bytes: 30,
        }
    }

    fn flow(generator: Arc<QueueGenerator>) -> GenerationFlow {
        GenerationFlow::new(LlmService::new(generator, RetryPolicy::immediate(3)), settings())
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            identity: StudentIdentity::parse("10305", "홍길동").unwrap(),
            notes: String::new(),
            pdf_bytes: b"%PDF-1.4".to_vec(),
        }
    }

    fn ctx() -> SubmissionCtx {
        SubmissionCtx::new("s", 1, 1)
    }

    fn full_report() -> String {
        REQUIRED_REPORT_SECTIONS.join("\n본문입니다.\n")
    }

    #[tokio::test]
    async fn runs_three_stages_in_order() {
        let generator = QueueGenerator::new(vec![
            Ok(full_report()),
            Ok("1. 강점입니다.\n2. 보완점입니다.".to_string()),
            Ok("가".repeat(20)),
        ]);
        let mut tracker = StageTracker::default();
        let outputs = flow(generator.clone())
            .run_tracked(&ctx(), &request(), &mut tracker)
            .await
            .unwrap();
        assert!(tracker.is_complete());

        let calls = generator.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].model, "model-a-pro");
        assert!(calls[0].attachment.is_some());
        assert_eq!(calls[1].model, "model-b-flash");
        assert!(calls[1].attachment.is_none());
        assert!(calls[1].prompt.contains("8. 인성 및 행동특성 종합 의견"));
        assert!(calls[2].prompt.contains("- 강점입니다."));

        assert_eq!(outputs.summary.text, "- 강점입니다.\n- 보완점입니다.");
        // 30 바이트 예산 = 한글 10자
        assert_eq!(outputs.guidance.text, "가".repeat(10));
        assert_eq!(outputs.guidance.stage, StageKind::Guidance);
    }

    #[tokio::test]
    async fn missing_section_triggers_exactly_one_continuation() {
        let partial = REQUIRED_REPORT_SECTIONS[..10].join("\n");
        let generator = QueueGenerator::new(vec![
            Ok(partial.clone()),
            Ok("  8. 인성 및 행동특성 종합 의견\n성실함  ".to_string()),
            Ok("요약".to_string()),
            Ok("지도".to_string()),
        ]);
        let outputs = flow(generator.clone()).run(&ctx(), &request()).await.unwrap();

        let calls = generator.calls();
        assert_eq!(calls.len(), 4);
        let continuation = &calls[1];
        assert!(continuation.attachment.is_none());
        assert_eq!(continuation.model, "model-a-pro");
        assert!(continuation.prompt.contains("누락 항목:\n8. 인성 및 행동특성 종합 의견"));

        assert_eq!(
            outputs.report.text,
            format!("{}\n\n8. 인성 및 행동특성 종합 의견\n성실함", partial)
        );
    }

    #[tokio::test]
    async fn still_incomplete_report_is_accepted() {
        let generator = QueueGenerator::new(vec![Ok("이어쓴 내용".to_string())]);
        let flow = flow(generator.clone());

        let report = flow.complete_report(" 짧은 보고서\n".to_string()).await.unwrap();
        assert_eq!(report, "짧은 보고서\n\n이어쓴 내용");
        assert_eq!(generator.calls().len(), 1);

        let complete = flow.complete_report(full_report()).await.unwrap();
        assert_eq!(complete, full_report());
        assert_eq!(generator.calls().len(), 1);
    }

    #[tokio::test]
    async fn failing_stage_halts_with_its_label() {
        let generator = QueueGenerator::new(vec![
            Ok(full_report()),
            Err(GenerationError::Api {
                model: "model-b-flash".to_string(),
                message: "403 permission denied".to_string(),
            }),
        ]);
        let flow = flow(generator.clone());
        let mut tracker = StageTracker::default();

        let err = flow
            .run_tracked(&ctx(), &request(), &mut tracker)
            .await
            .unwrap_err();

        assert_eq!(err.failed_stage(), Some(StageKind::Summary));
        assert!(err.to_string().starts_with("2단계"));
        assert_eq!(tracker.state(StageKind::Report), StageState::Done);
        assert_eq!(tracker.state(StageKind::Summary), StageState::Failed);
        assert_eq!(tracker.state(StageKind::Guidance), StageState::Pending);
        assert!(!tracker.is_complete());
        assert_eq!(
            tracker.to_string(),
            "1단계(컨설팅 보고서)=Done, 2단계(보고서 요약)=Failed, 3단계(담임교사 지도방침)=Pending"
        );
        assert_eq!(generator.calls().len(), 2);
    }
}
