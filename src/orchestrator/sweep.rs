//! 字母扫描器 - 编排层
//!
//! 按序遍历配置的字母区间，每个字母访问恰好一次：回到商店首页、
//! 定位搜索框、输入字母、提交，然后把结果页交给分页循环。
//! 单个字母的任何失败都只记为该字母失败（计 0）并继续下一个。

use std::time::Duration;

use anyhow::Result;
use chromiumoxide::Element;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::Engine;
use crate::models::{sweep_symbols, RunCounters, SymbolOutcome};
use crate::orchestrator::pagination;
use crate::utils::logging;
use crate::workflow::ItemCycle;

/// 搜索框的两种标记结构，按序探测
const SEARCH_INPUT_SELECTORS: [&str; 2] = [r#"input[type="search"]"#, r#"input[name="q"]"#];

/// 清空搜索框（两种结构都覆盖），返回是否找到输入框
const CLEAR_SEARCH_JS: &str = r#"
    (() => {
        const box = document.querySelector('input[type="search"], input[name="q"]');
        if (box) box.value = '';
        return !!box;
    })()
"#;

/// 字母扫描器
pub struct Sweep {
    config: Config,
    item_cycle: ItemCycle,
}

impl Sweep {
    /// 创建新的扫描器（条目流程只创建一次，整次扫描复用）
    pub fn new(config: Config) -> Self {
        Self {
            item_cycle: ItemCycle::new(&config),
            config,
        }
    }

    /// 执行整次扫描，返回累计计数
    ///
    /// 每个字母访问恰好一次、顺序固定，与该字母的成败无关；
    /// 一旦推进到下一个字母就绝不回头
    pub async fn run(&self, engine: &Engine) -> RunCounters {
        let mut counters = RunCounters::default();

        for symbol in sweep_symbols(self.config.sweep_start, self.config.sweep_end) {
            logging::log_symbol_start(symbol);

            let outcome = match self.sweep_symbol(engine, symbol).await {
                Ok(matches) => SymbolOutcome {
                    symbol,
                    matches,
                    failed: false,
                },
                Err(e) => {
                    error!("⚠️ 字母 \"{}\" 处理失败，跳到下一个字母: {}", symbol, e);
                    SymbolOutcome {
                        symbol,
                        matches: 0,
                        failed: true,
                    }
                }
            };

            logging::log_symbol_complete(symbol, outcome.matches);
            counters.record(outcome);
        }

        counters
    }

    /// 处理单个字母：发起搜索 + 分页循环
    async fn sweep_symbol(&self, engine: &Engine, symbol: char) -> Result<u32> {
        self.issue_query(engine, symbol).await?;
        Ok(pagination::run(engine, &self.item_cycle, &self.config, symbol).await)
    }

    /// 在商店首页发起一次字母搜索
    async fn issue_query(&self, engine: &Engine, symbol: char) -> Result<()> {
        engine.goto(&self.config.store_url).await?;
        engine.settle(self.config.settle_ms).await;

        // 定位搜索框；失败允许刷新一次再试
        let search_box = match self.find_search_box(engine).await {
            Ok(element) => element,
            Err(e) => {
                warn!("⚠️ 字母 {} 未找到搜索框，刷新后重试: {}", symbol, e);
                engine.reload().await?;
                self.find_search_box(engine).await?
            }
        };

        // 清空残留内容后逐字输入
        let cleared: bool = engine.eval_as(CLEAR_SEARCH_JS).await?;
        if !cleared {
            warn!("⚠️ 清空脚本未找到搜索框，继续尝试输入");
        }
        engine
            .type_slow(&search_box, &symbol.to_string(), self.config.type_delay_ms)
            .await?;
        info!("🔍 已在搜索框输入 \"{}\"", symbol);

        engine.press_enter_and_wait(&search_box).await?;
        info!("✨ \"{}\" 的搜索结果已加载!", symbol);

        Ok(())
    }

    /// 按序探测两种搜索框结构，超时预算均分
    async fn find_search_box(&self, engine: &Engine) -> AppResult<Element> {
        let per_selector =
            Duration::from_millis(self.config.selector_timeout_ms / SEARCH_INPUT_SELECTORS.len() as u64);

        for selector in SEARCH_INPUT_SELECTORS {
            if let Ok(element) = engine.wait_for_selector_within(selector, per_selector).await {
                return Ok(element);
            }
        }

        Err(AppError::selector_not_found(
            SEARCH_INPUT_SELECTORS.join(", "),
        ))
    }
}
