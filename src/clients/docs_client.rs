//! 문서 저장소 클라이언트 (Drive v3 + Docs v1)

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};

use crate::clients::google_http::GoogleHttp;
use crate::error::RemoteStoreError;
use crate::models::document::PlaceholderMap;

const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const DOCS_URL: &str = "https://docs.googleapis.com/v1/documents";

/// 문서 본문 요약: 텍스트와 끝 인덱스
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentBody {
    pub text: String,
    pub end_index: u64,
}

impl DocumentBody {
    /// Docs API `documents.get` 응답에서 본문 텍스트와 끝 인덱스를 뽑는다
    pub fn from_json(doc: &Value) -> Self {
        let content = doc
            .pointer("/body/content")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut text = String::new();
        for element in content {
            let runs = element
                .pointer("/paragraph/elements")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            for run in runs {
                if let Some(s) = run.pointer("/textRun/content").and_then(Value::as_str) {
                    text.push_str(s);
                }
            }
        }

        let end_index = content
            .last()
            .and_then(|e| e.get("endIndex"))
            .and_then(Value::as_u64)
            .unwrap_or(1);

        Self { text, end_index }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.text.contains(token)
    }
}

/// 문서 저장소
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 템플릿을 복사하고 새 문서 ID 를 돌려준다
    async fn copy_file(&self, template_id: &str, title: &str) -> Result<String, RemoteStoreError>;

    async fn get_parents(&self, file_id: &str) -> Result<Vec<String>, RemoteStoreError>;

    async fn move_file(
        &self,
        file_id: &str,
        add_parent: &str,
        remove_parents: &[String],
    ) -> Result<(), RemoteStoreError>;

    async fn get_body(&self, doc_id: &str) -> Result<DocumentBody, RemoteStoreError>;

    async fn insert_text(&self, doc_id: &str, index: u64, text: &str)
        -> Result<(), RemoteStoreError>;

    /// 모든 토큰을 한 번의 배치로 치환 (대소문자 구분)
    async fn replace_all(
        &self,
        doc_id: &str,
        replacements: &PlaceholderMap,
    ) -> Result<(), RemoteStoreError>;
}

/// Google Drive/Docs REST 클라이언트
#[derive(Debug, Clone)]
pub struct GoogleDocsClient {
    http: GoogleHttp,
}

impl GoogleDocsClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self, RemoteStoreError> {
        Ok(Self {
            http: GoogleHttp::new(access_token)?,
        })
    }
}

/// `replaceAllText` 요청 목록
pub fn replace_requests(replacements: &PlaceholderMap) -> Vec<Value> {
    replacements
        .iter()
        .map(|(token, value)| {
            json!({
                "replaceAllText": {
                    "containsText": { "text": token, "matchCase": true },
                    "replaceText": value,
                }
            })
        })
        .collect()
}

#[async_trait]
impl DocumentStore for GoogleDocsClient {
    async fn copy_file(&self, template_id: &str, title: &str) -> Result<String, RemoteStoreError> {
        const ENDPOINT: &str = "Drive Copy";
        let mut url = self
            .http
            .parse_url(ENDPOINT, &format!("{}/{}/copy", DRIVE_FILES_URL, template_id))?;
        url.query_pairs_mut()
            .append_pair("supportsAllDrives", "true")
            .append_pair("fields", "id");

        let body = json!({ "name": title });
        let response = self
            .http
            .send(ENDPOINT, Method::POST, url, Some(&body))
            .await?;

        response
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| RemoteStoreError::BadResponse {
                endpoint: ENDPOINT.to_string(),
                message: "응답에 id 가 없습니다".to_string(),
            })
    }

    async fn get_parents(&self, file_id: &str) -> Result<Vec<String>, RemoteStoreError> {
        const ENDPOINT: &str = "Drive Get";
        let mut url = self
            .http
            .parse_url(ENDPOINT, &format!("{}/{}", DRIVE_FILES_URL, file_id))?;
        url.query_pairs_mut()
            .append_pair("fields", "parents")
            .append_pair("supportsAllDrives", "true");

        let response = self.http.send(ENDPOINT, Method::GET, url, None).await?;
        Ok(response
            .get("parents")
            .and_then(Value::as_array)
            .map(|parents| {
                parents
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn move_file(
        &self,
        file_id: &str,
        add_parent: &str,
        remove_parents: &[String],
    ) -> Result<(), RemoteStoreError> {
        const ENDPOINT: &str = "Drive Move";
        let mut url = self
            .http
            .parse_url(ENDPOINT, &format!("{}/{}", DRIVE_FILES_URL, file_id))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("addParents", add_parent)
                .append_pair("supportsAllDrives", "true")
                .append_pair("fields", "id,parents");
            if !remove_parents.is_empty() {
                query.append_pair("removeParents", &remove_parents.join(","));
            }
        }

        self.http
            .send(ENDPOINT, Method::PATCH, url, Some(&json!({})))
            .await?;
        Ok(())
    }

    async fn get_body(&self, doc_id: &str) -> Result<DocumentBody, RemoteStoreError> {
        const ENDPOINT: &str = "Docs Get";
        let url = self
            .http
            .parse_url(ENDPOINT, &format!("{}/{}", DOCS_URL, doc_id))?;
        let response = self.http.send(ENDPOINT, Method::GET, url, None).await?;
        Ok(DocumentBody::from_json(&response))
    }

    async fn insert_text(
        &self,
        doc_id: &str,
        index: u64,
        text: &str,
    ) -> Result<(), RemoteStoreError> {
        const ENDPOINT: &str = "Docs Insert";
        let url = self
            .http
            .parse_url(ENDPOINT, &format!("{}/{}:batchUpdate", DOCS_URL, doc_id))?;
        let body = json!({
            "requests": [{
                "insertText": {
                    "location": { "index": index },
                    "text": text,
                }
            }]
        });
        self.http
            .send(ENDPOINT, Method::POST, url, Some(&body))
            .await?;
        Ok(())
    }

    async fn replace_all(
        &self,
        doc_id: &str,
        replacements: &PlaceholderMap,
    ) -> Result<(), RemoteStoreError> {
        if replacements.is_empty() {
            return Ok(());
        }
        const ENDPOINT: &str = "Docs Replace";
        let url = self
            .http
            .parse_url(ENDPOINT, &format!("{}/{}:batchUpdate", DOCS_URL, doc_id))?;
        let body = json!({ "requests": replace_requests(replacements) });
        self.http
            .send(ENDPOINT, Method::POST, url, Some(&body))
            .await?;
        Ok(())
    }
}
