//! 시트 저장소 클라이언트 (Sheets v4 values)

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};

use crate::clients::google_http::GoogleHttp;
use crate::error::RemoteStoreError;

const SHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// 행 단위 시트 저장소
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// A1 범위를 행 배열로 읽는다. 값은 모두 문자열로 바뀐다.
    async fn read_range(
        &self,
        sheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, RemoteStoreError>;

    /// 한 행을 사용자 입력 모드로 쓴다 (수식 해석됨)
    async fn write_row(
        &self,
        sheet_id: &str,
        range: &str,
        values: &[String],
    ) -> Result<(), RemoteStoreError>;
}

#[derive(Debug, Clone)]
pub struct GoogleSheetsClient {
    http: GoogleHttp,
}

impl GoogleSheetsClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self, RemoteStoreError> {
        Ok(Self {
            http: GoogleHttp::new(access_token)?,
        })
    }

    fn values_url(
        &self,
        endpoint: &str,
        sheet_id: &str,
        range: &str,
    ) -> Result<reqwest::Url, RemoteStoreError> {
        let mut url = self
            .http
            .parse_url(endpoint, &format!("{}/{}/values", SHEETS_URL, sheet_id))?;
        url.path_segments_mut()
            .map_err(|_| RemoteStoreError::BadResponse {
                endpoint: endpoint.to_string(),
                message: "경로를 붙일 수 없는 URL".to_string(),
            })?
            .push(range);
        Ok(url)
    }
}

fn cell_to_string(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// `values.get` 응답의 `values` 배열을 문자열 행렬로 변환
pub fn parse_value_rows(response: &Value) -> Vec<Vec<String>> {
    response
        .get("values")
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    row.as_array()
                        .map(|cells| cells.iter().map(cell_to_string).collect())
                        .unwrap_or_default()
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl LedgerStore for GoogleSheetsClient {
    async fn read_range(
        &self,
        sheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, RemoteStoreError> {
        const ENDPOINT: &str = "Sheets Read";
        let mut url = self.values_url(ENDPOINT, sheet_id, range)?;
        url.query_pairs_mut().append_pair("majorDimension", "ROWS");

        let response = self.http.send(ENDPOINT, Method::GET, url, None).await?;
        Ok(parse_value_rows(&response))
    }

    async fn write_row(
        &self,
        sheet_id: &str,
        range: &str,
        values: &[String],
    ) -> Result<(), RemoteStoreError> {
        const ENDPOINT: &str = "Sheets Write";
        let mut url = self.values_url(ENDPOINT, sheet_id, range)?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");

        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": [values],
        });
        self.http
            .send(ENDPOINT, Method::PUT, url, Some(&body))
            .await?;
        Ok(())
    }
}
