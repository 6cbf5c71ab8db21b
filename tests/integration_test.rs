use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use consulting_report::clients::{
    DocumentBody, DocumentStore, FormatHook, GenerationCall, LedgerStore, TextGenerator,
};
use consulting_report::config::Config;
use consulting_report::error::{
    AppError, FormatHookError, GenerationError, RemoteStoreError, ValidationError,
};
use consulting_report::infrastructure::{RateLimiter, RetryPolicy};
use consulting_report::models::document::DEBUG_TOKENS;
use consulting_report::models::{PlaceholderMap, StageKind, Submission};
use consulting_report::orchestrator::{App, Collaborators, SubmissionProcessor};
use consulting_report::services::prompts::REQUIRED_REPORT_SECTIONS;
use consulting_report::SubmissionCtx;

// ========== 메모리 협력자 ==========

/// 프롬프트 종류에 따라 응답하는 생성기
#[derive(Default)]
struct StubGenerator {
    calls: Mutex<Vec<GenerationCall>>,
    fail_summary: bool,
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, call: &GenerationCall) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(call.clone());
        if call.attachment.is_some() {
            return Ok(REQUIRED_REPORT_SECTIONS.join("\n본문입니다.\n"));
        }
        if call.prompt.contains("요약하십시오") {
            if self.fail_summary {
                return Err(GenerationError::Api {
                    model: call.model.clone(),
                    message: "401 unauthenticated".to_string(),
                });
            }
            return Ok("- 강점: 성실함\n학생부 스토리 한 문장".to_string());
        }
        Ok("담임 선생님께 드리는 지도방침입니다.".to_string())
    }
}

#[derive(Default)]
struct MemoryDocs {
    copies: Mutex<Vec<String>>,
    replaces: Mutex<Vec<(String, Vec<(String, String)>)>>,
    /// 몇 번째 복사(1부터)에서 404 를 낼지
    fail_copy_at: Option<usize>,
}

#[async_trait]
impl DocumentStore for MemoryDocs {
    async fn copy_file(&self, _template_id: &str, title: &str) -> Result<String, RemoteStoreError> {
        let mut copies = self.copies.lock().unwrap();
        if self.fail_copy_at == Some(copies.len() + 1) {
            return Err(RemoteStoreError::Status {
                endpoint: "drive.files.copy".to_string(),
                status: 404,
                message: "template not found".to_string(),
            });
        }
        copies.push(title.to_string());
        Ok(format!("doc{}", copies.len()))
    }

    async fn get_parents(&self, _file_id: &str) -> Result<Vec<String>, RemoteStoreError> {
        Ok(vec!["root".to_string()])
    }

    async fn move_file(
        &self,
        _file_id: &str,
        _add_parent: &str,
        _remove_parents: &[String],
    ) -> Result<(), RemoteStoreError> {
        Ok(())
    }

    async fn get_body(&self, _doc_id: &str) -> Result<DocumentBody, RemoteStoreError> {
        Ok(DocumentBody {
            text: "{{STUDENT_NAME}} {{STUDENT_NUM}} {{REPORT_CONTENT}} {{REPORT_SUMMARY}} \
                   {{HOMEROOM_GUIDANCE}} {{NOTES_BLOCK}}"
                .to_string(),
            end_index: 120,
        })
    }

    async fn insert_text(
        &self,
        _doc_id: &str,
        _index: u64,
        _text: &str,
    ) -> Result<(), RemoteStoreError> {
        Ok(())
    }

    async fn replace_all(
        &self,
        doc_id: &str,
        replacements: &PlaceholderMap,
    ) -> Result<(), RemoteStoreError> {
        let pairs = replacements
            .iter()
            .map(|(t, v)| (t.to_string(), v.to_string()))
            .collect();
        self.replaces
            .lock()
            .unwrap()
            .push((doc_id.to_string(), pairs));
        Ok(())
    }
}

#[derive(Default)]
struct MemorySheet {
    writes: Mutex<Vec<(String, Vec<String>)>>,
    fail_write: bool,
}

#[async_trait]
impl LedgerStore for MemorySheet {
    async fn read_range(
        &self,
        _sheet_id: &str,
        _range: &str,
    ) -> Result<Vec<Vec<String>>, RemoteStoreError> {
        Ok(vec![vec!["1".to_string()], vec!["1".to_string()]])
    }

    async fn write_row(
        &self,
        _sheet_id: &str,
        range: &str,
        values: &[String],
    ) -> Result<(), RemoteStoreError> {
        if self.fail_write {
            return Err(RemoteStoreError::Status {
                endpoint: "sheets.values.update".to_string(),
                status: 403,
                message: "permission denied".to_string(),
            });
        }
        self.writes
            .lock()
            .unwrap()
            .push((range.to_string(), values.to_vec()));
        Ok(())
    }
}

struct BrokenHook;

#[async_trait]
impl FormatHook for BrokenHook {
    async fn apply(&self, _doc_id: &str) -> Result<(), FormatHookError> {
        Err(FormatHookError::NonJson("<html>login</html>".to_string()))
    }
}

// ========== 조립 도우미 ==========

struct Harness {
    generator: Arc<StubGenerator>,
    docs: Arc<MemoryDocs>,
    sheet: Arc<MemorySheet>,
}

impl Harness {
    fn new(generator: StubGenerator) -> Self {
        Self::with_stores(generator, MemoryDocs::default(), MemorySheet::default())
    }

    fn with_stores(generator: StubGenerator, docs: MemoryDocs, sheet: MemorySheet) -> Self {
        Self {
            generator: Arc::new(generator),
            docs: Arc::new(docs),
            sheet: Arc::new(sheet),
        }
    }

    fn collaborators(&self, format_hook: Option<Arc<dyn FormatHook>>) -> Collaborators {
        Collaborators {
            generator: self.generator.clone(),
            documents: self.docs.clone(),
            ledger: self.sheet.clone(),
            format_hook,
        }
    }

    fn processor(&self, config: &Config, format_hook: Option<Arc<dyn FormatHook>>) -> SubmissionProcessor {
        SubmissionProcessor::from_config(
            config,
            self.collaborators(format_hook),
            Arc::new(RateLimiter::new(config.rate_limit_max, config.rate_limit_window())),
            RetryPolicy::immediate(3),
        )
    }

    fn generator_calls(&self) -> usize {
        self.generator.calls.lock().unwrap().len()
    }
}

fn config() -> Config {
    Config {
        llm_api_key: "test-key".to_string(),
        template_report_doc_id: "tpl-report".to_string(),
        template_guide_doc_id: "tpl-guide".to_string(),
        google_access_token: "token".to_string(),
        sheets_id: "sheet-1".to_string(),
        ..Config::default()
    }
}

fn submission(code: &str, name: &str, pdf: &[u8]) -> Submission {
    Submission {
        student_code: code.to_string(),
        student_name: name.to_string(),
        pdf_path: "self.pdf".to_string(),
        pdf_bytes: pdf.to_vec(),
        ..Submission::default()
    }
}

fn ctx() -> SubmissionCtx {
    SubmissionCtx::new("session-1", 1, 1)
}

// ========== 테스트 ==========

#[tokio::test]
async fn end_to_end_creates_two_documents_and_one_row() {
    let harness = Harness::new(StubGenerator::default());
    let processor = harness.processor(&config(), None);

    let outcome = processor
        .process(&ctx(), &submission("10305", "홍길동", b"%PDF-1.4"))
        .await
        .unwrap();

    assert!(!outcome.outputs.report.text.is_empty());
    assert!(!outcome.outputs.summary.text.is_empty());
    assert!(!outcome.outputs.guidance.text.is_empty());
    // 보고서가 완전하므로 이어쓰기 없이 세 번만 호출
    assert_eq!(harness.generator_calls(), 3);

    assert_eq!(
        *harness.docs.copies.lock().unwrap(),
        vec![
            "10305_홍길동".to_string(),
            "10305_홍길동_담임교사지도방침".to_string()
        ]
    );
    assert_ne!(outcome.report_doc.id, outcome.guidance_doc.id);

    let writes = harness.sheet.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    let (range, row) = &writes[0];
    assert_eq!(range, "'컨설팅 보고서'!A8:H8");
    assert_eq!(outcome.ledger_row, Some(8));
    assert_eq!(row[..5], ["1", "3", "5", "10305", "홍길동"]);
    assert_eq!(
        row[5],
        "=HYPERLINK(\"https://docs.google.com/document/d/doc1/edit\",\"컨설팅 보고서\")"
    );
    assert_eq!(
        row[6],
        "=HYPERLINK(\"https://docs.google.com/document/d/doc2/edit\",\"조언\")"
    );
    assert_eq!(row[7].len(), 19);
}

#[tokio::test]
async fn documents_receive_values_then_debug_cleanup() {
    let harness = Harness::new(StubGenerator::default());
    let mut notes_submission = submission("10305", "홍길동", b"%PDF-1.4");
    notes_submission.notes = "  과학 동아리 부장 ".to_string();

    harness
        .processor(&config(), None)
        .process(&ctx(), &notes_submission)
        .await
        .unwrap();

    let replaces = harness.docs.replaces.lock().unwrap();
    assert_eq!(replaces.len(), 4);

    let (doc, values) = &replaces[2];
    assert_eq!(doc, "doc2");
    assert!(values.contains(&("{{NOTES_BLOCK}}".to_string(), "과학 동아리 부장".to_string())));
    assert!(values
        .iter()
        .any(|(t, v)| t == "{{HOMEROOM_GUIDANCE}}" && v.contains("지도방침")));

    let (_, cleanup) = &replaces[3];
    assert_eq!(cleanup.len(), DEBUG_TOKENS.len());
}

#[tokio::test]
async fn invalid_input_is_rejected_before_any_remote_call() {
    let harness = Harness::new(StubGenerator::default());

    let cases = [
        (submission("12", "홍길동", b"%PDF"), ValidationError::InvalidStudentCode),
        (submission("10305", "   ", b"%PDF"), ValidationError::MissingName),
        (submission("10305", "홍길동", b""), ValidationError::MissingPdf),
    ];
    let mut unlimited = config();
    unlimited.rate_limit_max = 0;
    let processor = harness.processor(&unlimited, None);

    for (input, expected) in cases {
        let err = processor.process(&ctx(), &input).await.unwrap_err();
        match err {
            AppError::Validation(v) => assert_eq!(v, expected),
            other => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(harness.generator_calls(), 0);
    assert!(harness.docs.copies.lock().unwrap().is_empty());
    assert!(harness.sheet.writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn access_gate_blocks_wrong_code() {
    let harness = Harness::new(StubGenerator::default());
    let mut gated = config();
    gated.access_code = "tester".to_string();
    let processor = harness.processor(&gated, None);

    let mut input = submission("10305", "홍길동", b"%PDF");
    input.access_code = Some("guess".to_string());
    let err = processor.process(&ctx(), &input).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ValidationError::AccessDenied)));

    input.access_code = Some(" tester ".to_string());
    tokio_test::assert_ok!(processor.process(&ctx(), &input).await);
}

#[tokio::test]
async fn format_hook_failure_does_not_stop_the_run() {
    let harness = Harness::new(StubGenerator::default());
    let processor = harness.processor(&config(), Some(Arc::new(BrokenHook)));

    let outcome = processor
        .process(&ctx(), &submission("20101", "김영희", b"%PDF"))
        .await;
    tokio_test::assert_ok!(&outcome);
    assert_eq!(harness.sheet.writes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn stage_failure_writes_nothing() {
    let harness = Harness::new(StubGenerator {
        fail_summary: true,
        ..StubGenerator::default()
    });
    let processor = harness.processor(&config(), None);

    let err = processor
        .process(&ctx(), &submission("10305", "홍길동", b"%PDF"))
        .await
        .unwrap_err();

    assert_eq!(err.failed_stage(), Some(StageKind::Summary));
    assert!(err.to_string().starts_with("2단계"));
    // 치명적 오류는 재시도하지 않는다
    assert_eq!(harness.generator_calls(), 2);
    assert!(harness.docs.copies.lock().unwrap().is_empty());
    assert!(harness.sheet.writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn guidance_document_failure_keeps_report_and_skips_ledger() {
    let harness = Harness::with_stores(
        StubGenerator::default(),
        MemoryDocs {
            fail_copy_at: Some(2),
            ..MemoryDocs::default()
        },
        MemorySheet::default(),
    );
    let processor = harness.processor(&config(), None);

    let err = processor
        .process(&ctx(), &submission("10305", "홍길동", b"%PDF"))
        .await
        .unwrap_err();

    match err {
        AppError::Document(RemoteStoreError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("unexpected error: {other}"),
    }
    // 이미 만든 보고서 문서는 그대로 남는다
    assert_eq!(
        *harness.docs.copies.lock().unwrap(),
        vec!["10305_홍길동".to_string()]
    );
    assert!(harness.sheet.writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn ledger_write_failure_is_reported_after_both_documents() {
    let harness = Harness::with_stores(
        StubGenerator::default(),
        MemoryDocs::default(),
        MemorySheet {
            fail_write: true,
            ..MemorySheet::default()
        },
    );
    let processor = harness.processor(&config(), None);

    let err = processor
        .process(&ctx(), &submission("10305", "홍길동", b"%PDF"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Ledger(RemoteStoreError::Status { status: 403, .. })
    ));
    assert_eq!(harness.docs.copies.lock().unwrap().len(), 2);
    assert!(harness.sheet.writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn batch_continues_after_failures_and_respects_rate_limit() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("run.log");
    let mut cfg = config();
    cfg.output_log_file = log_path.to_str().unwrap().to_string();

    let harness = Harness::new(StubGenerator::default());
    let app = App::with_collaborators(cfg, harness.collaborators(None));

    let mut same_session = Vec::new();
    for name in ["가", "나", "다"] {
        let mut s = submission("10305", name, b"%PDF");
        s.session = Some("교실-1".to_string());
        same_session.push(s);
    }
    same_session.push(submission("bad", "라", b"%PDF"));

    let stats = app.process_all(&same_session).await;
    assert_eq!(stats.total, 4);
    assert_eq!(stats.success, 2);
    assert_eq!(stats.failed, 2);

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(log.lines().filter(|l| l.contains("✅")).count(), 2);
    assert!(log.contains("초 후 다시 시도하세요"));
}

#[tokio::test]
async fn loads_and_runs_submissions_from_folder() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("self.pdf"), b"%PDF-1.4").unwrap();
    std::fs::write(
        dir.path().join("10305.toml"),
        "student_code = \"10305\"\nstudent_name = \"홍길동\"\npdf_path = \"self.pdf\"\n",
    )
    .unwrap();

    let mut cfg = config();
    cfg.submissions_folder = dir.path().to_str().unwrap().to_string();
    cfg.output_log_file = dir.path().join("out.txt").to_str().unwrap().to_string();

    let harness = Harness::new(StubGenerator::default());
    let app = App::with_collaborators(cfg, harness.collaborators(None));

    let stats = app.run().await.unwrap();
    assert_eq!(stats.success, 1);
    assert_eq!(harness.docs.copies.lock().unwrap().len(), 2);
}

/// 실제 Gemini/Google 환경으로 제출 폴더 전체 실행
///
/// ```bash
/// cargo test live_run -- --ignored --nocapture
/// ```
#[tokio::test]
#[ignore]
async fn live_run() {
    consulting_report::utils::logging::init(true);

    let config = Config::from_env().expect("환경 변수 로드 실패");
    config.validate().expect("설정 검증 실패");

    let stats = App::initialize(config)
        .await
        .expect("초기화 실패")
        .run()
        .await
        .expect("실행 실패");

    assert_eq!(stats.failed, 0);
}
