//! 생성 모델 클라이언트
//!
//! OpenAI 호환 엔드포인트(Gemini 포함)로 채팅 완성 요청을 보낸다.
//! 재시도나 단계 개념은 모른다. 호출 한 번이 요청 한 번이다.
//! async-openai 내장 백오프는 꺼 두고, 재시도는 `infrastructure::retry` 에만 맡긴다.

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartFile,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::GenerationError;

/// 생성 요청 하나
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationCall {
    pub model: String,
    pub prompt: String,
    /// 첨부 PDF 바이트
    pub attachment: Option<Vec<u8>>,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// 텍스트 생성기
///
/// 빈 응답은 `GenerationError::EmptyResponse` 로 돌려줘야 한다.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, call: &GenerationCall) -> Result<String, GenerationError>;
}

/// PDF 를 data URL 로 변환
pub fn pdf_data_url(bytes: &[u8]) -> String {
    format!(
        "data:application/pdf;base64,{}",
        general_purpose::STANDARD.encode(bytes)
    )
}

/// 첨부 PDF 파일 이름
const ATTACHMENT_FILENAME: &str = "self_assessment.pdf";

/// 백오프 없음: 첫 실패에서 바로 오류를 돌려준다
fn single_attempt_backoff() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

/// PDF 를 파일 파트로 감싼다 (`file_data` + `filename`)
fn pdf_file_part(
    bytes: &[u8],
) -> Result<ChatCompletionRequestUserMessageContentPart, GenerationError> {
    let part: ChatCompletionRequestMessageContentPartFile = serde_json::from_value(json!({
        "file": {
            "file_data": pdf_data_url(bytes),
            "filename": ATTACHMENT_FILENAME,
        }
    }))
    .map_err(|e| GenerationError::Request(e.to_string()))?;
    Ok(ChatCompletionRequestUserMessageContentPart::File(part))
}

/// OpenAI 호환 API 클라이언트
pub struct OpenAiCompatClient {
    client: Client<OpenAIConfig>,
}

impl OpenAiCompatClient {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config).with_backoff(single_attempt_backoff()),
        }
    }

    fn build_user_message(
        call: &GenerationCall,
    ) -> Result<ChatCompletionRequestMessage, GenerationError> {
        let content = match &call.attachment {
            Some(pdf) if !pdf.is_empty() => {
                let parts = vec![
                    ChatCompletionRequestUserMessageContentPart::Text(
                        ChatCompletionRequestMessageContentPartText {
                            text: call.prompt.clone(),
                        },
                    ),
                    pdf_file_part(pdf)?,
                ];
                ChatCompletionRequestUserMessageContent::Array(parts)
            }
            _ => ChatCompletionRequestUserMessageContent::Text(call.prompt.clone()),
        };

        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        Ok(ChatCompletionRequestMessage::User(message))
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatClient {
    async fn generate(&self, call: &GenerationCall) -> Result<String, GenerationError> {
        debug!(
            "모델 호출: {} (프롬프트 {} 바이트, PDF {})",
            call.model,
            call.prompt.len(),
            call.attachment.as_ref().map(|p| p.len()).unwrap_or(0)
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&call.model)
            .messages(vec![Self::build_user_message(call)?])
            .temperature(call.temperature)
            .max_tokens(call.max_output_tokens)
            .build()
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("모델 {} 호출 실패: {}", call.model, e);
            GenerationError::Api {
                model: call.model.clone(),
                message: e.to_string(),
            }
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        let text = content.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse {
                model: call.model.clone(),
            });
        }

        debug!("모델 {} 응답 {} 바이트", call.model, text.len());
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;

    fn call(attachment: Option<Vec<u8>>) -> GenerationCall {
        GenerationCall {
            model: "gemini-2.5-pro".to_string(),
            prompt: "안녕".to_string(),
            attachment,
            temperature: 0.35,
            max_output_tokens: 8192,
        }
    }

    #[test]
    fn data_url_is_standard_base64() {
        assert_eq!(pdf_data_url(b"%PDF"), "data:application/pdf;base64,JVBERg==");
    }

    #[test]
    fn message_with_pdf_has_text_and_file_parts() {
        let message = OpenAiCompatClient::build_user_message(&call(Some(b"%PDF".to_vec()))).unwrap();
        let json = serde_json::to_value(&message).unwrap();
        let parts = json["content"].as_array().unwrap();

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["type"], "file");
        assert_eq!(
            parts[1]["file"]["file_data"],
            "data:application/pdf;base64,JVBERg=="
        );
        assert_eq!(parts[1]["file"]["filename"], ATTACHMENT_FILENAME);
    }

    /// 항상 503 을 돌려주는 로컬 서버. 받은 요청 수를 센다.
    async fn overloaded_server() -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let counter = counter.clone();
                tokio::spawn(async move {
                    read_request(&mut socket).await;
                    counter.fetch_add(1, Ordering::SeqCst);
                    let body = r#"{"error":{"message":"model overloaded","type":"server_error","param":null,"code":null}}"#;
                    let response = format!(
                        "HTTP/1.1 503 Service Unavailable\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        (format!("http://{}/v1", addr), hits)
    }

    /// 헤더와 content-length 만큼의 본문을 읽는다
    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let Ok(n) = socket.read(&mut chunk).await else {
                return;
            };
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                return;
            }
        }
    }

    #[tokio::test]
    async fn server_error_is_returned_after_a_single_request() {
        let (base_url, hits) = overloaded_server().await;
        let config = Config {
            llm_api_key: "test-key".to_string(),
            llm_api_base_url: base_url,
            ..Config::default()
        };
        let client = OpenAiCompatClient::new(&config);

        let result = tokio::time::timeout(Duration::from_secs(5), client.generate(&call(None)))
            .await
            .expect("내장 백오프로 재시도하면 시간 초과");

        assert!(matches!(result, Err(GenerationError::Api { .. })));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn message_without_pdf_is_plain_text() {
        for attachment in [None, Some(Vec::new())] {
            let message = OpenAiCompatClient::build_user_message(&call(attachment)).unwrap();
            match message {
                ChatCompletionRequestMessage::User(user) => assert!(matches!(
                    user.content,
                    ChatCompletionRequestUserMessageContent::Text(ref t) if t == "안녕"
                )),
                other => panic!("unexpected message: {other:?}"),
            }
        }
    }

    /// 실제 엔드포인트 호출
    ///
    /// ```bash
    /// GEMINI_API_KEY=... cargo test live_generation -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn live_generation() {
        let _ = tracing_subscriber::fmt::try_init();
        let config = Config::from_env().unwrap();
        let client = OpenAiCompatClient::new(&config);

        let mut request = call(None);
        request.prompt = "한 문장으로 자기소개를 해 주세요.".to_string();
        request.max_output_tokens = 256;

        let text = client.generate(&request).await.unwrap();
        println!("✅ 응답: {}", text);
        assert!(!text.is_empty());
    }
}
