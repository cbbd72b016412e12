//! 分页循环 - 编排层
//!
//! 在当前字母的结果页之间推进：等卡片、逐条委托、探测下一页。
//! 推进逻辑本身不接触浏览器，通过 `SymbolPages` 能力面驱动，
//! 生产实现由引擎 + 条目流程适配。

use tracing::{debug, info};

use crate::config::Config;
use crate::infrastructure::Engine;
use crate::workflow::{CrawlCtx, ItemCycle, ItemOutcome, PageFlow, APP_CARD_SELECTOR};

/// 分页控件容器
const PAGINATION_CONTAINER: &str = "div[data-pagination-controls]";

/// 下一页控件的两种标记结构，断定没有下一页之前必须都探测过
const NEXT_CONTROL_SELECTORS: [&str; 2] = [
    r#"div[data-pagination-controls] a[rel="next"]"#,
    r#"a[rel="next"][aria-label="Go to Next Page"]"#,
];

/// 分页循环依赖的能力面
pub(crate) trait SymbolPages {
    /// 等待本页出现至少一张卡片；false 表示本页没有结果
    async fn await_cards(&mut self) -> bool;
    /// 实时卡片数
    async fn card_count(&mut self) -> usize;
    /// 处理一个条目
    async fn run_item(&mut self, ctx: &CrawlCtx) -> ItemOutcome;
    /// 尝试翻到下一页；false 表示没有下一页或翻页失败
    async fn goto_next_page(&mut self) -> bool;
}

/// 遍历当前字母的所有结果页，返回命中数
///
/// 终止条件：某页等不到任何卡片（合法的零结果），或两种下一页
/// 控件都不存在，或翻页导航失败
pub async fn run(engine: &Engine, item_cycle: &ItemCycle, config: &Config, symbol: char) -> u32 {
    let mut source = EnginePages {
        engine,
        item_cycle,
        settle_ms: config.settle_ms,
    };
    run_pages(&mut source, symbol).await
}

/// 推进逻辑：页序单调递增，每页访问恰好一次，绝不回看
pub(crate) async fn run_pages(source: &mut impl SymbolPages, symbol: char) -> u32 {
    let mut matches = 0u32;
    let mut page_no = 1u32;

    loop {
        info!("\n--- 字母 \"{}\" 第 {} 页 ---", symbol, page_no);

        // 等待至少一张卡片出现；等不到视为本页无结果，正常结束
        if !source.await_cards().await {
            info!("⚠️ 第 {} 页没有应用，结束字母 \"{}\"", page_no, symbol);
            break;
        }

        info!(
            "📱 第 {} 页找到 {} 个应用",
            page_no,
            source.card_count().await
        );

        // 逐条处理；每个条目前都重新读实时卡片数，绝不复用
        // 导航前拿到的句柄
        let mut index = 0usize;
        loop {
            let live_count = source.card_count().await;
            if index >= live_count {
                break;
            }

            let ctx = CrawlCtx::new(symbol, page_no, index, live_count);
            let outcome = source.run_item(&ctx).await;

            // 命中先计数：分发在条目流程里已经发生，之后的走向
            // 不影响这一次递增
            if outcome.matched {
                matches += 1;
            }
            if outcome.flow == PageFlow::AbandonPage {
                break;
            }
            index += 1;
        }

        if !source.goto_next_page().await {
            break;
        }
        page_no += 1;
    }

    matches
}

/// 生产适配：把引擎与条目流程接到推进逻辑上
struct EnginePages<'a> {
    engine: &'a Engine,
    item_cycle: &'a ItemCycle,
    settle_ms: u64,
}

impl SymbolPages for EnginePages<'_> {
    async fn await_cards(&mut self) -> bool {
        self.engine
            .wait_for_selector(APP_CARD_SELECTOR)
            .await
            .is_ok()
    }

    async fn card_count(&mut self) -> usize {
        self.engine.query_all(APP_CARD_SELECTOR).await.len()
    }

    async fn run_item(&mut self, ctx: &CrawlCtx) -> ItemOutcome {
        self.item_cycle.run(self.engine, ctx).await
    }

    async fn goto_next_page(&mut self) -> bool {
        // 先把分页控件滚进视口，再按序探测两种控件
        if let Some(container) = self.engine.query_first(PAGINATION_CONTAINER).await {
            if let Err(e) = self.engine.scroll_into_view(&container).await {
                debug!("分页控件滚动失败: {}", e);
            }
        }
        self.engine.settle(self.settle_ms).await;

        let mut next_control = None;
        for selector in NEXT_CONTROL_SELECTORS {
            if let Some(element) = self.engine.query_first(selector).await {
                next_control = Some(element);
                break;
            }
        }

        let Some(control) = next_control else {
            info!("⚠️ 未找到下一页控件 - 已到最后一页");
            return false;
        };

        match self.engine.click_and_wait(&control).await {
            Ok(()) => {
                self.engine.settle(self.settle_ms).await;
                true
            }
            Err(e) if e.is_timeout() => {
                info!("⚠️ 翻页导航超时，视为最后一页");
                false
            }
            Err(e) => {
                info!("⚠️ 翻页导航失败，视为最后一页: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 一页的脚本：每个条目一个预设结果
    struct PageScript {
        outcomes: Vec<ItemOutcome>,
    }

    /// 脚本化的页面序列，记录推进逻辑走过的每一步
    struct ScriptedPages {
        pages: Vec<PageScript>,
        current: usize,
        cards_waits: u32,
        attempted: Vec<(char, u32, usize)>,
    }

    impl ScriptedPages {
        fn new(pages: Vec<Vec<ItemOutcome>>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|outcomes| PageScript { outcomes })
                    .collect(),
                current: 0,
                cards_waits: 0,
                attempted: Vec::new(),
            }
        }
    }

    impl SymbolPages for ScriptedPages {
        async fn await_cards(&mut self) -> bool {
            self.cards_waits += 1;
            !self.pages[self.current].outcomes.is_empty()
        }

        async fn card_count(&mut self) -> usize {
            self.pages[self.current].outcomes.len()
        }

        async fn run_item(&mut self, ctx: &CrawlCtx) -> ItemOutcome {
            self.attempted.push((ctx.symbol, ctx.page_no, ctx.item_index));
            self.pages[self.current].outcomes[ctx.item_index]
        }

        async fn goto_next_page(&mut self) -> bool {
            if self.current + 1 < self.pages.len() {
                self.current += 1;
                true
            } else {
                false
            }
        }
    }

    fn next(matched: bool) -> ItemOutcome {
        ItemOutcome {
            matched,
            flow: PageFlow::NextItem,
        }
    }

    fn abandon(matched: bool) -> ItemOutcome {
        ItemOutcome {
            matched,
            flow: PageFlow::AbandonPage,
        }
    }

    #[tokio::test]
    async fn test_visits_each_page_once_in_order() {
        let mut pages = ScriptedPages::new(vec![
            vec![next(false), next(false)],
            vec![next(true)],
            vec![next(false)],
        ]);

        let matches = run_pages(&mut pages, 'B').await;

        assert_eq!(matches, 1);
        assert_eq!(pages.cards_waits, 3);
        // 页序单调递增，每页访问恰好一次
        assert_eq!(
            pages.attempted,
            vec![('B', 1, 0), ('B', 1, 1), ('B', 2, 0), ('B', 3, 0)]
        );
    }

    #[tokio::test]
    async fn test_empty_page_ends_symbol() {
        let mut pages = ScriptedPages::new(vec![vec![]]);

        let matches = run_pages(&mut pages, 'Q').await;

        assert_eq!(matches, 0);
        assert_eq!(pages.cards_waits, 1);
        assert!(pages.attempted.is_empty());
    }

    #[tokio::test]
    async fn test_recovered_item_does_not_stop_the_page() {
        // 中间条目恢复后只计 0，其后的条目照常处理
        let mut pages =
            ScriptedPages::new(vec![vec![next(false), next(false), next(true), next(false)]]);

        let matches = run_pages(&mut pages, 'D').await;

        assert_eq!(matches, 1);
        assert_eq!(
            pages.attempted,
            vec![('D', 1, 0), ('D', 1, 1), ('D', 1, 2), ('D', 1, 3)]
        );
    }

    #[tokio::test]
    async fn test_match_kept_when_return_navigation_abandons_page() {
        // 行已写出但返回列表页失败：命中必须计数，本页剩余条目放弃
        let mut pages = ScriptedPages::new(vec![
            vec![next(false), abandon(true), next(true)],
            vec![next(true)],
        ]);

        let matches = run_pages(&mut pages, 'E').await;

        assert_eq!(matches, 2);
        // 放弃本页后第 3 个条目不再尝试，但仍会探测下一页
        assert_eq!(
            pages.attempted,
            vec![('E', 1, 0), ('E', 1, 1), ('E', 2, 0)]
        );
    }

    #[tokio::test]
    async fn test_single_symbol_multi_page_scenario() {
        // 字母 C 的两页结果：每页命中一个，翻页后终止
        let mut pages = ScriptedPages::new(vec![
            vec![next(false), next(true), next(false)],
            vec![next(true), next(false)],
        ]);

        let matches = run_pages(&mut pages, 'C').await;

        assert_eq!(matches, 2);
        assert_eq!(pages.cards_waits, 2);
        assert_eq!(pages.attempted.len(), 5);
        assert!(pages.attempted.iter().all(|(symbol, _, _)| *symbol == 'C'));
    }
}
