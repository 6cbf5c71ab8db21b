//! Google REST 공통 호출부
//!
//! 베어러 토큰을 붙여 요청을 보내고, 상태 코드와 JSON 본문을 `RemoteStoreError` 로 정리한다.

use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde_json::Value;
use tracing::debug;

use crate::error::RemoteStoreError;

/// 오류 메시지에 담는 응답 본문 최대 길이
const ERROR_BODY_PREVIEW: usize = 300;

/// 요청 하나의 최대 대기 시간 (연결부터 본문 수신까지)
pub const GOOGLE_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct GoogleHttp {
    http: Client,
    access_token: String,
}

impl GoogleHttp {
    pub fn new(access_token: impl Into<String>) -> Result<Self, RemoteStoreError> {
        Self::with_timeout(access_token, GOOGLE_HTTP_TIMEOUT)
    }

    pub fn with_timeout(
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteStoreError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RemoteStoreError::ClientBuild)?;
        Ok(Self {
            http,
            access_token: access_token.into(),
        })
    }

    pub fn parse_url(&self, endpoint: &str, raw: &str) -> Result<Url, RemoteStoreError> {
        Url::parse(raw).map_err(|e| RemoteStoreError::BadResponse {
            endpoint: endpoint.to_string(),
            message: format!("잘못된 URL {}: {}", raw, e),
        })
    }

    /// 요청을 보내고 JSON 본문을 돌려준다 (빈 본문은 `Value::Null`)
    pub async fn send(
        &self,
        endpoint: &str,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Value, RemoteStoreError> {
        debug!("{} {} {}", endpoint, method, url);

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(&self.access_token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|source| RemoteStoreError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| RemoteStoreError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        if !status.is_success() {
            return Err(RemoteStoreError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: text.chars().take(ERROR_BODY_PREVIEW).collect(),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| RemoteStoreError::BadResponse {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}
