//! 扫描上下文
//!
//! 封装"我正在处理哪个字母、第几页、第几个条目"这一信息。
//! 每一步调用都显式携带它，原则上任意一步都可以据此重放。

use std::fmt::Display;

/// 扫描上下文
#[derive(Debug, Clone)]
pub struct CrawlCtx {
    /// 当前扫描字母
    pub symbol: char,

    /// 结果页序号（从 1 开始）
    pub page_no: u32,

    /// 条目在当前页中的索引（从 0 开始）
    pub item_index: usize,

    /// 本页条目总数（仅用于日志显示）
    pub total_items: usize,
}

impl CrawlCtx {
    /// 创建新的扫描上下文
    pub fn new(symbol: char, page_no: u32, item_index: usize, total_items: usize) -> Self {
        Self {
            symbol,
            page_no,
            item_index,
            total_items,
        }
    }
}

impl Display for CrawlCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[字母 {} | 第 {} 页 | 应用 {}/{}]",
            self.symbol,
            self.page_no,
            self.item_index + 1,
            self.total_items
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefix() {
        let ctx = CrawlCtx::new('C', 2, 0, 24);
        assert_eq!(ctx.to_string(), "[字母 C | 第 2 页 | 应用 1/24]");
    }
}
