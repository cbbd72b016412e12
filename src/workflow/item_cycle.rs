//! 条目处理流程 - 流程层
//!
//! 核心职责：打开一个列表条目 → 提取 → 判定 → 分发 → 回到列表页。
//!
//! 流程分两段：判定与分发在前，返回导航在后。行一旦写出表格，
//! 命中就已定格；随后回到列表页的任何失败只能改变本页循环的走向，
//! 不能抹掉这一次命中。
//!
//! 所有故障在本层边界吸收：
//! - 被重定向出站 → 回到商店首页，放弃本页剩余条目
//! - 其他导航故障 → 尝试一次后退恢复，继续下一个条目
//! - 恢复本身再失败 → 放弃本页，绝不让整个运行崩溃

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::Engine;
use crate::models::{matches_target_year, AcceptedRow, ExtractedRecord};
use crate::services::{extract_record, RowDispatcher};
use crate::utils::logging::truncate_text;
use crate::workflow::crawl_ctx::CrawlCtx;

/// 列表页应用卡片的选择器
pub const APP_CARD_SELECTOR: &str = r#"div[data-app-card-target="wrapper"]"#;

/// 条目处理后对本页循环的指示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFlow {
    /// 继续处理本页下一个条目
    NextItem,
    /// 放弃本页剩余条目
    AbandonPage,
}

/// 单个条目的处理结果
///
/// 命中计数与循环走向相互独立：`matched` 在分发发生的那一刻定格，
/// `flow` 只描述本页循环接下来怎么走
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemOutcome {
    /// 是否通过筛选并已分发
    pub matched: bool,
    /// 本页循环的走向
    pub flow: PageFlow,
}

/// 判定阶段的结果（分发已在此阶段完成）
enum Judgement {
    Matched,
    NotMatched,
    /// 卡片集合收缩导致索引越界，属于正常竞态，静默跳过
    MissingCard,
}

/// 条目处理流程
///
/// - 不持有 Page 资源，只依赖引擎能力和分发能力
/// - 对同一个计数器至多递增一次：命中即计 1，其余一律计 0
pub struct ItemCycle {
    dispatcher: RowDispatcher,
    store_url: String,
    store_domain: String,
    target_year: String,
    settle_ms: u64,
    scroll_pause_ms: u64,
    scroll_steps: usize,
}

impl ItemCycle {
    /// 创建新的条目处理流程
    pub fn new(config: &Config) -> Self {
        Self {
            dispatcher: RowDispatcher::new(config),
            store_url: config.store_url.clone(),
            store_domain: config.store_domain.clone(),
            target_year: config.target_year.clone(),
            settle_ms: config.settle_ms,
            scroll_pause_ms: config.scroll_pause_ms,
            scroll_steps: config.scroll_steps,
        }
    }

    /// 处理一个列表条目，故障在本层吸收
    pub async fn run(&self, engine: &Engine, ctx: &CrawlCtx) -> ItemOutcome {
        // 第一阶段：打开、提取、判定、分发。命中在这里定格。
        let matched = match self.open_and_judge(engine, ctx).await {
            Ok(Judgement::Matched) => true,
            Ok(Judgement::NotMatched) => false,
            Ok(Judgement::MissingCard) => {
                return ItemOutcome {
                    matched: false,
                    flow: PageFlow::NextItem,
                };
            }
            Err(e) => {
                warn!("{} ⚠️ 处理应用出错: {}", ctx, e);
                return ItemOutcome {
                    matched: false,
                    flow: self.recover(engine, ctx).await,
                };
            }
        };

        // 第二阶段：回到列表页。此处的失败只影响走向，命中不回退。
        let flow = match self.return_to_listing(engine).await {
            Ok(()) => PageFlow::NextItem,
            Err(e) => {
                warn!("{} ⚠️ 返回列表页失败: {}", ctx, e);
                self.recover(engine, ctx).await
            }
        };

        ItemOutcome { matched, flow }
    }

    async fn open_and_judge(&self, engine: &Engine, ctx: &CrawlCtx) -> AppResult<Judgement> {
        // 每次都重新解析卡片集合：上一个条目的往返导航会整体替换 DOM 子树
        let cards = engine.query_all(APP_CARD_SELECTOR).await;
        let Some(card) = cards.get(ctx.item_index) else {
            debug!("{} 索引越界（当前 {} 张卡片），跳过", ctx, cards.len());
            return Ok(Judgement::MissingCard);
        };

        info!("\n{} 🔍 正在检查...", ctx);

        // 打开详情页
        engine.scroll_into_view(card).await?;
        engine.settle(self.scroll_pause_ms).await;
        engine.click_and_wait(card).await?;
        info!("{} ✅ 应用页面已打开", ctx);

        // 立即捕获规范链接——后续滚动可能触发额外导航，必须先拿到
        let item_link = engine.current_url().await?;
        debug!("{} 🔗 链接: {}", ctx, item_link);

        // 分段滚动，逼出懒加载的详情区块
        for _ in 0..self.scroll_steps {
            engine.scroll_viewport().await?;
            engine.settle(self.scroll_pause_ms).await;
        }
        engine.settle(self.settle_ms).await;

        // 提取；拿不到 HTML 时降级为占位记录，不中断
        let record = match engine.page_html().await {
            Ok(html) => extract_record(&html),
            Err(e) => {
                warn!("{} ⚠️ 读取页面内容失败: {}", ctx, e);
                ExtractedRecord::placeholder()
            }
        };

        info!("{} 📱 应用: {}", ctx, truncate_text(&record.app_name, 60));
        info!(
            "{} 📅 上架日期: {} | ⭐ 评分: {} ({} 条评论)",
            ctx,
            record.launch_date.as_deref().unwrap_or("未找到"),
            record.rating.as_deref().unwrap_or("未找到"),
            record.total_reviews.as_deref().unwrap_or("N/A"),
        );

        // 收录判定：上架日期包含目标年份，唯一的过滤条件
        if !matches_target_year(record.launch_date.as_deref(), &self.target_year) {
            return Ok(Judgement::NotMatched);
        }

        info!("{} 🎉 命中目标年份应用!", ctx);
        let row = AcceptedRow::from_record(ctx.symbol, record, item_link);
        self.dispatcher.send(&row).await;
        engine.settle(self.settle_ms).await;

        Ok(Judgement::Matched)
    }

    /// 回到列表页，恢复外层循环的不变量
    async fn return_to_listing(&self, engine: &Engine) -> AppResult<()> {
        engine.go_back().await?;
        engine.settle(self.settle_ms).await;
        engine.wait_for_selector(APP_CARD_SELECTOR).await?;
        Ok(())
    }

    /// 条目边界恢复，只决定本页循环的走向
    async fn recover(&self, engine: &Engine, ctx: &CrawlCtx) -> PageFlow {
        // 被重定向出站：直接回到商店首页，放弃本页剩余条目
        match engine.current_url().await {
            Ok(url) if !url.contains(&self.store_domain) => {
                warn!("{} ⚠️ 已离开商店域名 ({})，返回首页", ctx, url);
                if let Err(e) = engine.goto(&self.store_url).await {
                    warn!("{} ⚠️ 返回首页失败: {}", ctx, e);
                }
                return PageFlow::AbandonPage;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("{} ⚠️ 无法读取当前 URL: {}", ctx, e);
                return PageFlow::AbandonPage;
            }
        }

        // 仍在站内：尝试一次后退恢复，成功则继续下一个条目
        match engine.go_back().await {
            Ok(()) => {
                engine.settle(self.settle_ms).await;
                PageFlow::NextItem
            }
            Err(e) => {
                // 恢复本身也失败，放弃本页
                warn!("{} ⚠️ 后退恢复失败: {}", ctx, e);
                PageFlow::AbandonPage
            }
        }
    }
}
