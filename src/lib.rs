//! # Shopify App Sweep
//!
//! 一个对应用商店做字母穷举扫描的 Rust 应用程序：按字母逐个搜索、
//! 翻遍每页结果、打开每个应用详情页提取上架信息，命中目标年份的
//! 应用逐条写入 Google 表格。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `Engine` - 唯一的 page owner，提供带超时上界的导航/等待/执行能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单条记录
//! - `extractor` - 详情页 HTML → 结构化记录（纯函数，策略表驱动）
//! - `RowDispatcher` - 写表格能力（失败吞掉，不中断采集）
//! - `SheetsClient` - Sheets values REST 封装
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个列表条目"的完整处理流程
//! - `CrawlCtx` - 上下文封装（字母 + 页号 + 条目索引）
//! - `ItemCycle` - 流程编排（打开 → 提取 → 判定 → 分发 → 返回），
//!   故障在条目边界吸收
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/sweep` - 字母扫描器，单字母失败不中断整次扫描
//! - `orchestrator/pagination` - 分页循环，逐页推进
//! - `orchestrator/app` - 应用生命周期，唯一持有浏览器资源
//!
//! ## 并发模型
//!
//! 严格串行：一个浏览器会话、同一时刻至多一次导航在途。字母之间、
//! 页之间、条目之间都没有并行，所有等待都是有超时上界的挂起。

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{connect_to_browser_and_page, launch_headless_browser};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::Engine;
pub use models::{AcceptedRow, ExtractedRecord, RunCounters, SymbolOutcome};
pub use orchestrator::{App, Sweep};
pub use services::{extract_record, RowDispatcher, SheetsClient};
pub use workflow::{CrawlCtx, ItemCycle, ItemOutcome, PageFlow};
