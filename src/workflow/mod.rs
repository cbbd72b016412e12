//! 流程层
//!
//! 定义"一个列表条目"的完整处理流程

pub mod crawl_ctx;
pub mod item_cycle;

pub use crawl_ctx::CrawlCtx;
pub use item_cycle::{ItemCycle, ItemOutcome, PageFlow, APP_CARD_SELECTOR};
