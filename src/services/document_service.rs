//! 문서 생성 서비스 - 업무 능력 계층
//!
//! 템플릿 복사 → 폴더 이동 → 플레이스홀더 확보 → 일괄 치환 → (선택) 서식 훅 → 디버그 토큰 제거.
//! 서식 훅을 뺀 나머지 단계가 모두 끝나야 문서 URL 이 유효하다.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clients::docs_client::DocumentStore;
use crate::clients::format_hook::FormatHook;
use crate::error::RemoteStoreError;
use crate::infrastructure::retry::{classify_store_error, execute_with_retry, RetryPolicy};
use crate::models::document::{
    DocumentRecord, Placeholder, PlaceholderMap, DEBUG_TOKENS, GUIDANCE_PLACEHOLDERS,
    HOMEROOM_GUIDANCE, NOTES_BLOCK, REPORT_CONTENT, REPORT_PLACEHOLDERS, REPORT_SUMMARY,
    STUDENT_NAME, STUDENT_NUM,
};
use crate::models::identity::StudentIdentity;
use crate::models::stage::GenerationOutputs;

/// 문서 하나를 만드는 데 필요한 입력
#[derive(Debug, Clone)]
pub struct DocumentSpec<'a> {
    pub template_id: &'a str,
    /// 비어 있으면 기본 위치에 둔다
    pub folder_id: &'a str,
    pub title: String,
    pub placeholders: &'static [Placeholder],
    pub values: PlaceholderMap,
}

impl<'a> DocumentSpec<'a> {
    /// 컨설팅 보고서 문서
    pub fn report(
        template_id: &'a str,
        folder_id: &'a str,
        identity: &StudentIdentity,
        outputs: &GenerationOutputs,
    ) -> Self {
        let values = PlaceholderMap::new()
            .with(STUDENT_NAME, identity.name())
            .with(STUDENT_NUM, identity.code())
            .with(REPORT_CONTENT, outputs.report.text.trim())
            .with(REPORT_SUMMARY, outputs.summary.text.trim());
        Self {
            template_id,
            folder_id,
            title: identity.report_title(),
            placeholders: REPORT_PLACEHOLDERS,
            values,
        }
    }

    /// 담임교사 지도방침 문서
    pub fn guidance(
        template_id: &'a str,
        folder_id: &'a str,
        identity: &StudentIdentity,
        outputs: &GenerationOutputs,
        notes: &str,
    ) -> Self {
        let values = PlaceholderMap::new()
            .with(STUDENT_NAME, identity.name())
            .with(STUDENT_NUM, identity.code())
            .with(NOTES_BLOCK, notes.trim())
            .with(REPORT_SUMMARY, outputs.summary.text.trim())
            .with(HOMEROOM_GUIDANCE, outputs.guidance.text.trim());
        Self {
            template_id,
            folder_id,
            title: identity.guidance_title(),
            placeholders: GUIDANCE_PLACEHOLDERS,
            values,
        }
    }
}

/// 빠진 플레이스홀더를 문서 끝에 붙일 블록
pub fn placeholder_block(missing: &[&Placeholder]) -> String {
    let mut block = String::from("\n");
    for placeholder in missing {
        block.push_str(&format!("\n[{}]\n{}\n", placeholder.label, placeholder.token));
    }
    block.push('\n');
    block
}

/// 디버그 토큰을 빈 문자열로 바꾸는 매핑
pub fn debug_token_cleanup() -> PlaceholderMap {
    DEBUG_TOKENS
        .iter()
        .fold(PlaceholderMap::new(), |map, token| map.with(*token, ""))
}

/// 문서 생성기
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    format_hook: Option<Arc<dyn FormatHook>>,
    retry: RetryPolicy,
}

impl DocumentService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        format_hook: Option<Arc<dyn FormatHook>>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            store,
            format_hook,
            retry,
        }
    }

    /// 템플릿 복사본을 만들고 치환까지 끝낸 문서를 돌려준다
    pub async fn materialize(&self, spec: &DocumentSpec<'_>) -> Result<DocumentRecord, RemoteStoreError> {
        let doc_id = self.copy_template(spec).await?;
        debug!("템플릿 복사 완료: {} → {}", spec.template_id, doc_id);

        self.ensure_placeholders(&doc_id, spec.placeholders).await?;

        execute_with_retry(&self.retry, "Docs Replace", classify_store_error, || {
            self.store.replace_all(&doc_id, &spec.values)
        })
        .await?;

        if let Some(hook) = &self.format_hook {
            match hook.apply(&doc_id).await {
                Ok(()) => info!("🎨 서식 적용 완료: {}", spec.title),
                Err(e) => warn!(
                    "⚠️ 자동 서식 적용을 건너뜁니다 ({}): {}. 문서 메뉴에서 직접 서식을 적용하세요.",
                    spec.title, e
                ),
            }
        }

        let cleanup = debug_token_cleanup();
        execute_with_retry(&self.retry, "Docs Cleanup", classify_store_error, || {
            self.store.replace_all(&doc_id, &cleanup)
        })
        .await?;

        let record = DocumentRecord::new(doc_id, spec.title.clone());
        info!("📄 문서 생성: {} ({})", record.title, record.url);
        Ok(record)
    }

    async fn copy_template(&self, spec: &DocumentSpec<'_>) -> Result<String, RemoteStoreError> {
        let doc_id = execute_with_retry(&self.retry, "Drive Copy", classify_store_error, || {
            self.store.copy_file(spec.template_id, &spec.title)
        })
        .await?;

        let folder_id = spec.folder_id.trim();
        if folder_id.is_empty() {
            return Ok(doc_id);
        }

        let parents = execute_with_retry(&self.retry, "Drive Get Parents", classify_store_error, || {
            self.store.get_parents(&doc_id)
        })
        .await?;
        let remove: Vec<String> = parents.into_iter().filter(|p| p != folder_id).collect();

        execute_with_retry(&self.retry, "Drive Move Folder", classify_store_error, || {
            self.store.move_file(&doc_id, folder_id, &remove)
        })
        .await?;

        Ok(doc_id)
    }

    async fn ensure_placeholders(
        &self,
        doc_id: &str,
        placeholders: &[Placeholder],
    ) -> Result<(), RemoteStoreError> {
        let body = execute_with_retry(&self.retry, "Docs Get", classify_store_error, || {
            self.store.get_body(doc_id)
        })
        .await?;

        let missing: Vec<&Placeholder> = placeholders
            .iter()
            .filter(|p| !body.contains(p.token))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }

        warn!(
            "템플릿에 플레이스홀더 {}개가 없어 문서 끝에 추가합니다: {}",
            missing.len(),
            missing.iter().map(|p| p.token).collect::<Vec<_>>().join(", ")
        );

        let block = placeholder_block(&missing);
        let index = body.end_index.saturating_sub(1).max(1);
        execute_with_retry(&self.retry, "Docs Insert Placeholder", classify_store_error, || {
            self.store.insert_text(doc_id, index, &block)
        })
        .await
    }
}
