//! 시트 기록 서비스 - 업무 능력 계층
//!
//! 6행부터 아래로 내려가며 A열이 빈 첫 행을 찾아 A~H 8칸을 한 번에 쓴다.
//! 읽기와 쓰기 사이에 잠금이 없으므로 동시 제출끼리 같은 행을 덮어쓸 수 있다.

use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use crate::clients::sheets_client::LedgerStore;
use crate::error::RemoteStoreError;
use crate::infrastructure::retry::{classify_store_error, execute_with_retry, RetryPolicy};
use crate::models::ledger::LedgerRow;

/// 첫 데이터 행 (1~5행은 머리글)
pub const FIRST_DATA_ROW: usize = 6;
/// 한 번에 읽는 마지막 행
pub const LAST_SCAN_ROW: usize = 1005;
/// 생성 시각 형식
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A1 표기용 탭 이름 (작은따옴표로 감싸고 내부 따옴표는 두 번)
pub fn quote_tab(tab: &str) -> String {
    format!("'{}'", tab.replace('\'', "''"))
}

pub fn scan_range(tab: &str) -> String {
    format!("{}!A{}:H{}", quote_tab(tab), FIRST_DATA_ROW, LAST_SCAN_ROW)
}

pub fn row_range(tab: &str, row: usize) -> String {
    format!("{}!A{}:H{}", quote_tab(tab), row, row)
}

/// A열이 빈 첫 행의 절대 행 번호. 빈 행이 없으면 마지막으로 읽은 행의 다음 행.
pub fn find_target_row(rows: &[Vec<String>]) -> usize {
    let offset = rows
        .iter()
        .position(|row| row.first().map_or(true, |a| a.trim().is_empty()))
        .unwrap_or(rows.len());
    FIRST_DATA_ROW + offset
}

/// 시트 기록기
pub struct LedgerWriter {
    store: Arc<dyn LedgerStore>,
    sheet_id: String,
    tab: String,
    retry: RetryPolicy,
}

impl LedgerWriter {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        sheet_id: impl Into<String>,
        tab: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            store,
            sheet_id: sheet_id.into(),
            tab: tab.into(),
            retry,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.sheet_id.trim().is_empty()
    }

    /// 한 행 기록. 기록한 절대 행 번호를 돌려주고, 시트가 설정되지 않았으면 `None`.
    pub async fn append(&self, row: &LedgerRow) -> Result<Option<usize>, RemoteStoreError> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.append_with_timestamp(row, &timestamp).await
    }

    pub async fn append_with_timestamp(
        &self,
        row: &LedgerRow,
        timestamp: &str,
    ) -> Result<Option<usize>, RemoteStoreError> {
        if !self.is_enabled() {
            warn!("⚠️ SHEETS_ID 가 비어 있어 시트 기록을 건너뜁니다");
            return Ok(None);
        }

        let read_range = scan_range(&self.tab);
        let rows = execute_with_retry(&self.retry, "Sheets Read", classify_store_error, || {
            self.store.read_range(&self.sheet_id, &read_range)
        })
        .await?;

        let target = find_target_row(&rows);
        let mut values = row.values();
        values.push(timestamp.to_string());

        let write_range = row_range(&self.tab, target);
        execute_with_retry(&self.retry, "Sheets Write", classify_store_error, || {
            self.store.write_row(&self.sheet_id, &write_range, &values)
        })
        .await?;

        info!("📝 시트 기록 완료: {}행 ({})", target, row.code);
        Ok(Some(target))
    }
}
