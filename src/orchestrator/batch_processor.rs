//! 일괄 제출 처리기 - 편성 계층
//!
//! ## 역할
//!
//! 애플리케이션 진입점. 원격 클라이언트를 한 번만 만들어 처리기에 넘기고,
//! 제출 폴더의 TOML 파일을 하나씩 순서대로 처리한다.
//!
//! - 한 제출이 실패해도 다음 제출로 넘어간다
//! - 결과마다 실행 로그 파일에 한 줄씩 남긴다
//! - 마지막에 전체 통계를 출력한다

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::clients::{
    FormatHook, GoogleDocsClient, GoogleSheetsClient, OpenAiCompatClient, WebAppFormatHook,
};
use crate::config::Config;
use crate::infrastructure::{RateLimiter, RetryPolicy};
use crate::models::loaders::load_all_submissions;
use crate::models::submission::Submission;
use crate::orchestrator::submission_processor::{Collaborators, SubmissionProcessor};
use crate::utils::logging::{
    append_log_line, init_log_file, log_startup, log_submission_start, print_final_stats,
};
use crate::workflow::SubmissionCtx;

/// 처리 통계
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

/// 애플리케이션 본체
pub struct App {
    config: Config,
    processor: SubmissionProcessor,
}

impl App {
    /// 실제 Google/Gemini 클라이언트로 초기화
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(&config.submissions_folder, config.auto_gas_format);

        let format_hook: Option<Arc<dyn FormatHook>> = if config.auto_gas_format {
            Some(Arc::new(WebAppFormatHook::new(
                config.gas_webapp_url.clone(),
                config.gas_token.clone(),
            )?))
        } else {
            None
        };

        let collaborators = Collaborators {
            generator: Arc::new(OpenAiCompatClient::new(&config)),
            documents: Arc::new(GoogleDocsClient::new(config.google_access_token.clone())?),
            ledger: Arc::new(GoogleSheetsClient::new(config.google_access_token.clone())?),
            format_hook,
        };

        Ok(Self::with_collaborators(config, collaborators))
    }

    /// 협력자를 직접 넘겨 조립
    pub fn with_collaborators(config: Config, collaborators: Collaborators) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_max,
            config.rate_limit_window(),
        ));
        let processor = SubmissionProcessor::from_config(
            &config,
            collaborators,
            rate_limiter,
            RetryPolicy::new(config.max_retries),
        );
        Self { config, processor }
    }

    /// 제출 폴더 전체 처리
    pub async fn run(&self) -> Result<ProcessingStats> {
        info!("\n📁 제출 파일을 찾는 중...");
        let submissions = load_all_submissions(&self.config.submissions_folder).await?;

        if submissions.is_empty() {
            warn!("⚠️ 처리할 TOML 파일이 없습니다. 프로그램을 종료합니다");
            return Ok(ProcessingStats::default());
        }
        info!("✓ 제출 {}건을 찾았습니다", submissions.len());

        let stats = self.process_all(&submissions).await;

        print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );
        Ok(stats)
    }

    /// 순서대로 하나씩 처리
    pub async fn process_all(&self, submissions: &[Submission]) -> ProcessingStats {
        let total = submissions.len();
        let mut stats = ProcessingStats {
            total,
            ..Default::default()
        };

        for (idx, submission) in submissions.iter().enumerate() {
            let index = idx + 1;
            let label = submission.label();
            log_submission_start(index, total, &label);

            let ctx = SubmissionCtx::new(submission.session_key(), index, total);
            let line = match self.processor.process(&ctx, submission).await {
                Ok(outcome) => {
                    stats.success += 1;
                    format!(
                        "✅ {} | 보고서 {} | 지도방침 {} | 시트 {}",
                        label,
                        outcome.report_doc.url,
                        outcome.guidance_doc.url,
                        outcome
                            .ledger_row
                            .map(|r| format!("{}행", r))
                            .unwrap_or_else(|| "기록 안 함".to_string())
                    )
                }
                Err(e) => {
                    stats.failed += 1;
                    error!("{} ❌ 처리 실패: {}", ctx, e);
                    format!("❌ {} | {}", label, e)
                }
            };

            if let Err(e) = append_log_line(&self.config.output_log_file, &line) {
                warn!("실행 로그 기록 실패: {}", e);
            }
        }

        stats
    }
}
