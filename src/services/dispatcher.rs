//! 行分发服务 - 业务能力层
//!
//! 只负责"把一条收录记录写进表格"，任何写入失败都在此吞掉——
//! 表格不可用不能中断采集，丢的是这一条记录，不是整个运行。

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::AcceptedRow;
use crate::services::sheet_sink::SheetsClient;

/// 表格的必需列，按建表顺序
pub const SHEET_COLUMNS: [&str; 6] = [
    "Search Letter",
    "App Name",
    "Launch Date",
    "Rating",
    "Total Reviews",
    "App Link",
];

/// 可选字段缺失时写入的占位值
pub const PLACEHOLDER: &str = "N/A";

/// 行分发服务
pub struct RowDispatcher {
    client: SheetsClient,
    /// 未配置表格凭据时只打日志，不发请求
    enabled: bool,
}

impl RowDispatcher {
    /// 创建新的行分发服务
    pub fn new(config: &Config) -> Self {
        let enabled = !config.spreadsheet_id.is_empty() && !config.sheets_token.is_empty();
        if !enabled {
            warn!("⚠️ 未配置表格 ID 或访问令牌，收录记录将只输出到日志");
        }
        Self {
            client: SheetsClient::new(config),
            enabled,
        }
    }

    /// 写入一条收录记录，绝不向外抛错
    pub async fn send(&self, row: &AcceptedRow) {
        if !self.enabled {
            info!(
                "📋 [仅日志] {} | {} | {}",
                row.search_letter, row.app_name, row.item_link
            );
            return;
        }

        match self.try_send(row).await {
            Ok(()) => {
                info!("✅ 已写入表格: {} - {}", row.app_name, row.item_link);
            }
            Err(e) => {
                // 这一条丢了，继续采集
                error!("❌ 表格写入失败（记录丢弃）: {}", e);
            }
        }
    }

    async fn try_send(&self, row: &AcceptedRow) -> AppResult<()> {
        let header = self.client.ensure_header(&SHEET_COLUMNS).await?;
        self.client.append_row(&header, &row_values(row)).await
    }
}

/// 将收录记录映射为 (列名, 取值)，可选字段缺失补占位值
pub fn row_values(row: &AcceptedRow) -> Vec<(String, String)> {
    let or_placeholder =
        |field: &Option<String>| field.clone().unwrap_or_else(|| PLACEHOLDER.to_string());

    vec![
        ("Search Letter".to_string(), row.search_letter.to_string()),
        ("App Name".to_string(), row.app_name.clone()),
        ("Launch Date".to_string(), or_placeholder(&row.launch_date)),
        ("Rating".to_string(), or_placeholder(&row.rating)),
        ("Total Reviews".to_string(), or_placeholder(&row.total_reviews)),
        ("App Link".to_string(), row.item_link.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> AcceptedRow {
        AcceptedRow {
            search_letter: 'C',
            app_name: "Demo App".to_string(),
            launch_date: Some("Launched March 2025".to_string()),
            rating: None,
            total_reviews: None,
            item_link: "https://apps.shopify.com/demo-app".to_string(),
        }
    }

    #[test]
    fn test_row_values_placeholders() {
        let values = row_values(&sample_row());
        let get = |name: &str| {
            values
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
                .expect("缺少列")
        };

        assert_eq!(get("Search Letter"), "C");
        assert_eq!(get("App Name"), "Demo App");
        assert_eq!(get("Launch Date"), "Launched March 2025");
        assert_eq!(get("Rating"), PLACEHOLDER);
        assert_eq!(get("Total Reviews"), PLACEHOLDER);
        assert_eq!(get("App Link"), "https://apps.shopify.com/demo-app");
    }

    #[test]
    fn test_row_values_cover_all_columns() {
        let values = row_values(&sample_row());
        for col in SHEET_COLUMNS {
            assert!(values.iter().any(|(n, _)| n == col), "缺少列: {}", col);
        }
        assert_eq!(values.len(), SHEET_COLUMNS.len());
    }
}
