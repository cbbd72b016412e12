//! 表格客户端 - 业务能力层
//!
//! 封装 Google Sheets v4 values REST 接口：读表头、补表头、追加行。
//! 访问令牌由外部提供，这里只负责带上它。

use serde_json::{json, Value as JsonValue};
use tracing::debug;

use crate::config::Config;
use crate::error::{AppResult, SinkError};

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// 表格客户端
pub struct SheetsClient {
    http: reqwest::Client,
    spreadsheet_id: String,
    token: String,
    sheet_name: String,
}

impl SheetsClient {
    /// 创建新的表格客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            token: config.sheets_token.clone(),
            sheet_name: config.sheet_name.clone(),
        }
    }

    /// 确保表头包含全部必需列，返回最终表头
    ///
    /// 只做增量：已有列保持原位，缺失列追加到末尾，绝不删除
    pub async fn ensure_header(&self, required: &[&str]) -> AppResult<Vec<String>> {
        let existing = self.read_header().await?;

        match merged_header(&existing, required) {
            Some(merged) => {
                debug!("表头缺列，更新为: {:?}", merged);
                self.write_header(&merged).await?;
                Ok(merged)
            }
            None => Ok(existing),
        }
    }

    /// 追加一行，按表头列名对齐取值
    pub async fn append_row(&self, header: &[String], values: &[(String, String)]) -> AppResult<()> {
        let row = row_for_header(header, values);
        let endpoint = format!(
            "{}/{}/values/{}!A1:append",
            DEFAULT_BASE_URL, self.spreadsheet_id, self.sheet_name
        );

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.token)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&json!({ "values": [row] }))
            .send()
            .await?;

        check_status(&endpoint, response).await?;
        Ok(())
    }

    async fn read_header(&self) -> AppResult<Vec<String>> {
        let endpoint = format!(
            "{}/{}/values/{}!1:1",
            DEFAULT_BASE_URL, self.spreadsheet_id, self.sheet_name
        );

        let response = self.http.get(&endpoint).bearer_auth(&self.token).send().await?;
        let body: JsonValue = check_status(&endpoint, response).await?.json().await?;

        let header = body
            .get("values")
            .and_then(|v| v.as_array())
            .and_then(|rows| rows.first())
            .and_then(|row| row.as_array())
            .map(|cells| {
                cells
                    .iter()
                    .filter_map(|c| c.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Ok(header)
    }

    async fn write_header(&self, header: &[String]) -> AppResult<()> {
        let endpoint = format!(
            "{}/{}/values/{}!1:1",
            DEFAULT_BASE_URL, self.spreadsheet_id, self.sheet_name
        );

        let response = self
            .http
            .put(&endpoint)
            .bearer_auth(&self.token)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "values": [header] }))
            .send()
            .await?;

        check_status(&endpoint, response).await?;
        Ok(())
    }
}

/// 计算增量合并后的表头；无需更新时返回 None
fn merged_header(existing: &[String], required: &[&str]) -> Option<Vec<String>> {
    let missing: Vec<&str> = required
        .iter()
        .filter(|col| !existing.iter().any(|e| e == *col))
        .copied()
        .collect();

    if missing.is_empty() {
        return None;
    }

    let mut merged = existing.to_vec();
    merged.extend(missing.into_iter().map(str::to_string));
    Some(merged)
}

/// 按表头列名对齐一行的取值，缺失列留空
fn row_for_header(header: &[String], values: &[(String, String)]) -> Vec<String> {
    header
        .iter()
        .map(|col| {
            values
                .iter()
                .find(|(name, _)| name == col)
                .map(|(_, value)| value.clone())
                .unwrap_or_default()
        })
        .collect()
}

async fn check_status(endpoint: &str, response: reqwest::Response) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SinkError::BadResponse {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body: crate::utils::logging::truncate_text(&body, 200),
    }
    .into())
}
