use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 浏览器调试端口（0 表示自行启动无头浏览器）
    pub browser_debug_port: u16,
    /// Chrome/Edge 可执行文件路径（自行启动时可选）
    pub chrome_executable: Option<String>,
    /// 应用商店首页
    pub store_url: String,
    /// 应用商店域名（用于判断是否被重定向出站）
    pub store_domain: String,
    /// 扫描起始字母
    pub sweep_start: char,
    /// 扫描结束字母
    pub sweep_end: char,
    /// 目标年份子串（出现在上架日期中才收录）
    pub target_year: String,
    /// 导航超时（毫秒）
    pub nav_timeout_ms: u64,
    /// 等待选择器超时（毫秒）
    pub selector_timeout_ms: u64,
    /// 固定沉降延迟（毫秒）
    pub settle_ms: u64,
    /// 滚动后的短暂停顿（毫秒）
    pub scroll_pause_ms: u64,
    /// 详情页懒加载滚动次数
    pub scroll_steps: usize,
    /// 输入搜索字母的按键间隔（毫秒）
    pub type_delay_ms: u64,
    /// Google 表格文档 ID
    pub spreadsheet_id: String,
    /// Sheets API 访问令牌（由外部提供）
    pub sheets_token: String,
    /// 工作表名称
    pub sheet_name: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 0,
            chrome_executable: None,
            store_url: "https://apps.shopify.com/".to_string(),
            store_domain: "apps.shopify.com".to_string(),
            sweep_start: 'B',
            sweep_end: 'Z',
            target_year: "2025".to_string(),
            nav_timeout_ms: 120_000,
            selector_timeout_ms: 30_000,
            settle_ms: 1_500,
            scroll_pause_ms: 600,
            scroll_steps: 3,
            type_delay_ms: 100,
            spreadsheet_id: String::new(),
            sheets_token: String::new(),
            sheet_name: "Sheet1".to_string(),
            verbose_logging: false,
        }
    }
}

/// TOML 配置文件的可选字段（缺省项回落到默认值）
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    browser_debug_port: Option<u16>,
    chrome_executable: Option<String>,
    store_url: Option<String>,
    store_domain: Option<String>,
    sweep_start: Option<char>,
    sweep_end: Option<char>,
    target_year: Option<String>,
    nav_timeout_ms: Option<u64>,
    selector_timeout_ms: Option<u64>,
    settle_ms: Option<u64>,
    scroll_pause_ms: Option<u64>,
    scroll_steps: Option<usize>,
    type_delay_ms: Option<u64>,
    spreadsheet_id: Option<String>,
    sheets_token: Option<String>,
    sheet_name: Option<String>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 从环境变量加载配置（未设置的字段使用默认值）
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT", default.browser_debug_port),
            chrome_executable: std::env::var("CHROME_EXECUTABLE")
                .ok()
                .or(default.chrome_executable),
            store_url: std::env::var("STORE_URL").unwrap_or(default.store_url),
            store_domain: std::env::var("STORE_DOMAIN").unwrap_or(default.store_domain),
            sweep_start: env_char("SWEEP_START", default.sweep_start),
            sweep_end: env_char("SWEEP_END", default.sweep_end),
            target_year: std::env::var("TARGET_YEAR").unwrap_or(default.target_year),
            nav_timeout_ms: env_parse("NAV_TIMEOUT_MS", default.nav_timeout_ms),
            selector_timeout_ms: env_parse("SELECTOR_TIMEOUT_MS", default.selector_timeout_ms),
            settle_ms: env_parse("SETTLE_MS", default.settle_ms),
            scroll_pause_ms: env_parse("SCROLL_PAUSE_MS", default.scroll_pause_ms),
            scroll_steps: env_parse("SCROLL_STEPS", default.scroll_steps),
            type_delay_ms: env_parse("TYPE_DELAY_MS", default.type_delay_ms),
            spreadsheet_id: std::env::var("SPREADSHEET_ID").unwrap_or(default.spreadsheet_id),
            sheets_token: std::env::var("SHEETS_TOKEN").unwrap_or(default.sheets_token),
            sheet_name: std::env::var("SHEET_NAME").unwrap_or(default.sheet_name),
            verbose_logging: env_parse("VERBOSE_LOGGING", default.verbose_logging),
        }
    }

    /// 从 TOML 配置文件加载（文件中缺省的字段使用默认值）
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// 从 TOML 字符串加载
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(content).context("解析 TOML 配置失败")?;
        let default = Self::default();
        Ok(Self {
            browser_debug_port: file.browser_debug_port.unwrap_or(default.browser_debug_port),
            chrome_executable: file.chrome_executable.or(default.chrome_executable),
            store_url: file.store_url.unwrap_or(default.store_url),
            store_domain: file.store_domain.unwrap_or(default.store_domain),
            sweep_start: file.sweep_start.unwrap_or(default.sweep_start),
            sweep_end: file.sweep_end.unwrap_or(default.sweep_end),
            target_year: file.target_year.unwrap_or(default.target_year),
            nav_timeout_ms: file.nav_timeout_ms.unwrap_or(default.nav_timeout_ms),
            selector_timeout_ms: file
                .selector_timeout_ms
                .unwrap_or(default.selector_timeout_ms),
            settle_ms: file.settle_ms.unwrap_or(default.settle_ms),
            scroll_pause_ms: file.scroll_pause_ms.unwrap_or(default.scroll_pause_ms),
            scroll_steps: file.scroll_steps.unwrap_or(default.scroll_steps),
            type_delay_ms: file.type_delay_ms.unwrap_or(default.type_delay_ms),
            spreadsheet_id: file.spreadsheet_id.unwrap_or(default.spreadsheet_id),
            sheets_token: file.sheets_token.unwrap_or(default.sheets_token),
            sheet_name: file.sheet_name.unwrap_or(default.sheet_name),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
        })
    }

    /// 加载配置：存在 sweep.toml（或 SWEEP_CONFIG 指定的文件）时优先读取，
    /// 否则回落到环境变量
    pub fn load() -> Self {
        let path = std::env::var("SWEEP_CONFIG").unwrap_or_else(|_| "sweep.toml".to_string());
        if Path::new(&path).exists() {
            match Self::from_file(&path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("⚠️ 配置文件 {} 加载失败，改用环境变量: {}", path, e);
                }
            }
        }
        Self::from_env()
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_char(name: &str, default: char) -> char {
    std::env::var(name)
        .ok()
        .and_then(|v| v.chars().next())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sweep_range() {
        let config = Config::default();
        assert_eq!(config.sweep_start, 'B');
        assert_eq!(config.sweep_end, 'Z');
        assert_eq!(config.target_year, "2025");
        assert_eq!(config.store_domain, "apps.shopify.com");
    }

    #[test]
    fn test_from_toml_str_partial() {
        let config = Config::from_toml_str(
            r#"
            sweep_start = "A"
            target_year = "2026"
            scroll_steps = 5
            spreadsheet_id = "doc-123"
            "#,
        )
        .expect("解析配置失败");

        assert_eq!(config.sweep_start, 'A');
        assert_eq!(config.sweep_end, 'Z');
        assert_eq!(config.target_year, "2026");
        assert_eq!(config.scroll_steps, 5);
        assert_eq!(config.spreadsheet_id, "doc-123");
        // 未出现的字段保持默认
        assert_eq!(config.nav_timeout_ms, 120_000);
    }

    #[test]
    fn test_from_toml_str_rejects_garbage() {
        assert!(Config::from_toml_str("sweep_start = [1, 2]").is_err());
    }
}
