//! 단일 제출 처리기 - 편성 계층
//!
//! 검증 → 세 단계 생성 → 문서 두 개 생성 → 시트 기록.
//! 문서가 둘 다 완성되기 전에는 시트에 아무것도 쓰지 않는다.
//! 중간에 실패해도 이미 만든 문서는 지우지 않는다.

use std::sync::Arc;

use tracing::info;

use crate::clients::{DocumentStore, FormatHook, LedgerStore, TextGenerator};
use crate::config::Config;
use crate::error::{AppError, AppResult, ValidationError};
use crate::infrastructure::{RateLimiter, RetryPolicy};
use crate::models::document::DocumentRecord;
use crate::models::ledger::LedgerRow;
use crate::models::stage::GenerationOutputs;
use crate::models::submission::{GenerationRequest, Submission};
use crate::services::{DocumentService, DocumentSpec, LedgerWriter, LlmService};
use crate::workflow::{GenerationFlow, GenerationSettings, SubmissionCtx};

/// 문서 템플릿/폴더와 접근 코드
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessorSettings {
    pub template_report_doc_id: String,
    pub template_guide_doc_id: String,
    pub drive_folder_id_report: String,
    pub drive_folder_id_guide: String,
    /// 비어 있으면 접근 제한 없음
    pub access_code: String,
}

impl ProcessorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            template_report_doc_id: config.template_report_doc_id.clone(),
            template_guide_doc_id: config.template_guide_doc_id.clone(),
            drive_folder_id_report: config.drive_folder_id_report.clone(),
            drive_folder_id_guide: config.drive_folder_id_guide.clone(),
            access_code: config.access_code.clone(),
        }
    }
}

/// 처리 결과
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub outputs: GenerationOutputs,
    pub report_doc: DocumentRecord,
    pub guidance_doc: DocumentRecord,
    /// 기록한 시트 행 (시트 미설정이면 None)
    pub ledger_row: Option<usize>,
}

/// 외부 협력자 묶음
pub struct Collaborators {
    pub generator: Arc<dyn TextGenerator>,
    pub documents: Arc<dyn DocumentStore>,
    pub ledger: Arc<dyn LedgerStore>,
    pub format_hook: Option<Arc<dyn FormatHook>>,
}

pub struct SubmissionProcessor {
    settings: ProcessorSettings,
    rate_limiter: Arc<RateLimiter>,
    flow: GenerationFlow,
    documents: DocumentService,
    ledger: LedgerWriter,
}

impl SubmissionProcessor {
    pub fn new(
        settings: ProcessorSettings,
        rate_limiter: Arc<RateLimiter>,
        flow: GenerationFlow,
        documents: DocumentService,
        ledger: LedgerWriter,
    ) -> Self {
        Self {
            settings,
            rate_limiter,
            flow,
            documents,
            ledger,
        }
    }

    /// 설정과 협력자로 처리기 조립
    pub fn from_config(
        config: &Config,
        collaborators: Collaborators,
        rate_limiter: Arc<RateLimiter>,
        retry: RetryPolicy,
    ) -> Self {
        let flow = GenerationFlow::new(
            LlmService::new(collaborators.generator, retry.clone()),
            GenerationSettings::from_config(config),
        );
        let documents =
            DocumentService::new(collaborators.documents, collaborators.format_hook, retry.clone());
        let ledger = LedgerWriter::new(
            collaborators.ledger,
            config.sheets_id.clone(),
            config.sheets_tab.clone(),
            retry,
        );

        Self::new(
            ProcessorSettings::from_config(config),
            rate_limiter,
            flow,
            documents,
            ledger,
        )
    }

    /// 원격 호출 전 검증: 빈도 제한 → 접근 코드 → 학번 → 이름 → PDF
    pub fn validate(
        &self,
        ctx: &SubmissionCtx,
        submission: &Submission,
    ) -> Result<GenerationRequest, ValidationError> {
        self.rate_limiter.check(&ctx.session)?;

        let required = self.settings.access_code.trim();
        if !required.is_empty() {
            let given = submission.access_code.as_deref().unwrap_or_default().trim();
            if given != required {
                return Err(ValidationError::AccessDenied);
            }
        }

        submission.validate()
    }

    pub async fn process(
        &self,
        ctx: &SubmissionCtx,
        submission: &Submission,
    ) -> AppResult<SubmissionOutcome> {
        let request = self.validate(ctx, submission)?;
        let identity = &request.identity;
        info!("{} {} 생성 시작", ctx, identity);

        let outputs = self.flow.run(ctx, &request).await?;

        info!("{} 📑 Google Docs 생성/치환 중...", ctx);
        let report_spec = DocumentSpec::report(
            &self.settings.template_report_doc_id,
            &self.settings.drive_folder_id_report,
            identity,
            &outputs,
        );
        let report_doc = self
            .documents
            .materialize(&report_spec)
            .await
            .map_err(AppError::Document)?;

        let guidance_spec = DocumentSpec::guidance(
            &self.settings.template_guide_doc_id,
            &self.settings.drive_folder_id_guide,
            identity,
            &outputs,
            &request.notes,
        );
        let guidance_doc = self
            .documents
            .materialize(&guidance_spec)
            .await
            .map_err(AppError::Document)?;

        let row = LedgerRow::new(identity, &report_doc, &guidance_doc);
        let ledger_row = self.ledger.append(&row).await.map_err(AppError::Ledger)?;

        info!("{} 🎉 완료: {} / {}", ctx, report_doc.url, guidance_doc.url);

        Ok(SubmissionOutcome {
            outputs,
            report_doc,
            guidance_doc,
            ledger_row,
        })
    }
}
