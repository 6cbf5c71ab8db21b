//! 서식 적용 웹훅
//!
//! 생성된 문서 ID 를 넘겨 외부 스크립트가 서식을 입히게 한다.
//! 실패해도 문서 생성은 계속되므로 호출자는 오류를 경고로만 남긴다.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::FormatHookError;

const HOOK_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait FormatHook: Send + Sync {
    async fn apply(&self, doc_id: &str) -> Result<(), FormatHookError>;
}

/// Apps Script 웹앱 서식 훅
#[derive(Debug, Clone)]
pub struct WebAppFormatHook {
    http: Client,
    url: String,
    token: String,
}

impl WebAppFormatHook {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Result<Self, FormatHookError> {
        let http = Client::builder().timeout(HOOK_TIMEOUT).build()?;
        Ok(Self {
            http,
            url: url.into(),
            token: token.into(),
        })
    }
}

/// 응답 해석: JSON 이어야 하고 `ok` 가 true 여야 한다
pub fn check_hook_response(content_type: &str, body: &str) -> Result<(), FormatHookError> {
    if !content_type.contains("application/json") {
        return Err(FormatHookError::NonJson(body.chars().take(200).collect()));
    }
    let parsed: Value = serde_json::from_str(body)
        .map_err(|_| FormatHookError::NonJson(body.chars().take(200).collect()))?;
    if parsed.get("ok").and_then(Value::as_bool) == Some(true) {
        Ok(())
    } else {
        Err(FormatHookError::NotOk)
    }
}

#[async_trait]
impl FormatHook for WebAppFormatHook {
    async fn apply(&self, doc_id: &str) -> Result<(), FormatHookError> {
        debug!("서식 훅 호출: {}", doc_id);
        let response = self
            .http
            .get(&self.url)
            .query(&[("docId", doc_id), ("token", self.token.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() != 200 {
            return Err(FormatHookError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_lowercase();
        let body = response.text().await?;

        check_hook_response(&content_type, &body)
    }
}
