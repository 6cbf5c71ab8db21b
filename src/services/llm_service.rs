//! 생성 서비스 - 업무 능력 계층
//!
//! 모델 호출 한 번에 샘플링 파라미터와 재시도를 입힌다. 단계 순서는 모른다.

use std::sync::Arc;

use tracing::debug;

use crate::clients::llm_client::{GenerationCall, TextGenerator};
use crate::error::GenerationError;
use crate::infrastructure::retry::{classify_generation_error, execute_with_retry, RetryPolicy};

/// 생성 온도
pub const TEMPERATURE: f32 = 0.35;
/// `pro` 계열 모델의 최대 출력 토큰
pub const MAX_TOKENS_PRO: u32 = 8192;
/// 그 밖의 모델
pub const MAX_TOKENS_DEFAULT: u32 = 4096;

/// 모델 ID 로 최대 출력 토큰 결정
pub fn max_output_tokens_for(model: &str) -> u32 {
    if model.trim().ends_with("pro") {
        MAX_TOKENS_PRO
    } else {
        MAX_TOKENS_DEFAULT
    }
}

/// 생성 서비스
pub struct LlmService {
    generator: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
}

impl LlmService {
    pub fn new(generator: Arc<dyn TextGenerator>, retry: RetryPolicy) -> Self {
        Self { generator, retry }
    }

    /// 요청 파라미터 구성
    pub fn build_call(model: &str, prompt: &str, pdf: Option<&[u8]>) -> GenerationCall {
        let attachment = pdf.filter(|bytes| !bytes.is_empty()).map(<[u8]>::to_vec);
        GenerationCall {
            model: model.to_string(),
            prompt: prompt.to_string(),
            attachment,
            temperature: TEMPERATURE,
            max_output_tokens: max_output_tokens_for(model),
        }
    }

    /// 재시도를 포함한 생성
    ///
    /// 일시적 오류와 빈 응답은 백오프 후 다시 시도하고, 그 밖의 오류는 즉시 돌려준다.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        pdf: Option<&[u8]>,
    ) -> Result<String, GenerationError> {
        let call = Self::build_call(model, prompt, pdf);
        let label = format!("모델 {}", model);

        let text = execute_with_retry(&self.retry, &label, classify_generation_error, || {
            self.generator.generate(&call)
        })
        .await?;

        debug!("모델 {} 생성 완료 ({} 바이트)", model, text.len());
        Ok(text)
    }
}
