//! 扫描数据模型
//!
//! 所有计数器都按值返回并向上累加，不使用全局可变状态

use serde::{Deserialize, Serialize};

/// 从应用详情页提取的原始记录
///
/// 每个字段各自尽力提取，单个字段失败不影响其他字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// 应用名称（缺失时为 "Unknown"）
    pub app_name: String,
    /// 上架日期原文（未找到时为 None）
    pub launch_date: Option<String>,
    /// 评分原文
    pub rating: Option<String>,
    /// 评论总数
    pub total_reviews: Option<String>,
}

impl ExtractedRecord {
    /// 提取完全失败时的占位记录
    pub fn placeholder() -> Self {
        Self {
            app_name: "Error".to_string(),
            launch_date: None,
            rating: None,
            total_reviews: None,
        }
    }
}

/// 通过筛选、准备写入表格的一行
///
/// `item_link` 必须在详情页加载完成后立即捕获——它是区分同名应用的
/// 唯一可靠自然键
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedRow {
    /// 当前扫描字母
    pub search_letter: char,
    pub app_name: String,
    pub launch_date: Option<String>,
    pub rating: Option<String>,
    pub total_reviews: Option<String>,
    /// 应用详情页的规范 URL
    pub item_link: String,
}

impl AcceptedRow {
    /// 由提取记录 + 扫描上下文组装
    pub fn from_record(search_letter: char, record: ExtractedRecord, item_link: String) -> Self {
        Self {
            search_letter,
            app_name: record.app_name,
            launch_date: record.launch_date,
            rating: record.rating,
            total_reviews: record.total_reviews,
            item_link,
        }
    }
}

/// 单个字母的扫描结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolOutcome {
    pub symbol: char,
    /// 该字母命中的应用数量
    pub matches: u32,
    /// 搜索框定位失败等导致整个字母被跳过
    pub failed: bool,
}

/// 整次扫描的累计计数
///
/// 只增不减，结束时用于汇报总量
#[derive(Debug, Default, Clone)]
pub struct RunCounters {
    pub total_matches: u32,
    pub symbols: Vec<SymbolOutcome>,
}

impl RunCounters {
    /// 记录一个字母的结果并累加总数
    pub fn record(&mut self, outcome: SymbolOutcome) {
        self.total_matches += outcome.matches;
        self.symbols.push(outcome);
    }
}

/// 生成扫描字母序列（含两端，顺序固定）
///
/// 起始字母默认为 B：沿用线上观察到的行为，A 是否纳入由配置决定
pub fn sweep_symbols(start: char, end: char) -> Vec<char> {
    if start > end {
        return Vec::new();
    }
    (start..=end).collect()
}

/// 收录判定：上架日期非空且包含目标年份子串，除此之外没有任何过滤
pub fn matches_target_year(launch_date: Option<&str>, target_year: &str) -> bool {
    launch_date.map(|d| d.contains(target_year)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_symbols_default_range() {
        let symbols = sweep_symbols('B', 'Z');
        assert_eq!(symbols.len(), 25);
        assert_eq!(symbols.first(), Some(&'B'));
        assert_eq!(symbols.last(), Some(&'Z'));
        // 顺序固定且无重复
        let mut sorted = symbols.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, symbols);
    }

    #[test]
    fn test_sweep_symbols_single_and_empty() {
        assert_eq!(sweep_symbols('C', 'C'), vec!['C']);
        assert!(sweep_symbols('Z', 'B').is_empty());
    }

    #[test]
    fn test_matches_target_year() {
        assert!(!matches_target_year(None, "2025"));
        assert!(!matches_target_year(Some("Launched 2024"), "2025"));
        assert!(matches_target_year(Some("Launched March 2025"), "2025"));
        assert!(matches_target_year(Some("2025"), "2025"));
    }

    #[test]
    fn test_run_counters_accumulate() {
        let mut counters = RunCounters::default();
        counters.record(SymbolOutcome {
            symbol: 'B',
            matches: 2,
            failed: false,
        });
        counters.record(SymbolOutcome {
            symbol: 'C',
            matches: 0,
            failed: true,
        });
        assert_eq!(counters.total_matches, 2);
        assert_eq!(counters.symbols.len(), 2);
    }

    #[test]
    fn test_accepted_row_from_record() {
        let record = ExtractedRecord {
            app_name: "Demo App".to_string(),
            launch_date: Some("Launched March 2025".to_string()),
            rating: None,
            total_reviews: None,
        };
        let row = AcceptedRow::from_record(
            'C',
            record,
            "https://apps.shopify.com/demo-app".to_string(),
        );
        assert_eq!(row.search_letter, 'C');
        assert_eq!(row.app_name, "Demo App");
        assert_eq!(row.item_link, "https://apps.shopify.com/demo-app");
    }
}
