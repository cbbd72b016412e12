//! 日志工具模块
//!
//! 提供日志初始化和输出格式的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// RUST_LOG 优先；未设置时 verbose 决定 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 重复初始化（如多个测试）时静默忽略
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(start: char, end: char, target_year: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 应用商店字母扫描模式");
    info!("🔤 扫描范围: {} - {}", start, end);
    info!("📅 目标年份: {}", target_year);
    info!("{}", "=".repeat(60));
}

/// 记录单个字母扫描开始
pub fn log_symbol_start(symbol: char) {
    info!("\n\n{} 开始搜索: {} {}", "=".repeat(20), symbol, "=".repeat(20));
}

/// 记录单个字母扫描结束
pub fn log_symbol_complete(symbol: char, matches: u32) {
    if matches == 0 {
        info!("\n⚠️ 字母 \"{}\" 未找到符合条件的应用", symbol);
    } else {
        info!("\n✅ 字母 \"{}\" 完成 - 命中 {} 个应用", symbol, matches);
    }
}

/// 打印最终统计信息
pub fn print_final_stats(total_matches: u32, failed_symbols: usize) {
    info!("\n\n{} 扫描完成 {}", "=".repeat(20), "=".repeat(20));
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🎯 全部字母共命中: {} 个应用", total_matches);
    if failed_symbols > 0 {
        info!("⚠️ 跳过的字母数: {}", failed_symbols);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
