//! 应用生命周期 - 编排层

use anyhow::Result;
use chromiumoxide::Browser;
use tracing::{info, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::Engine;
use crate::models::RunCounters;
use crate::orchestrator::Sweep;
use crate::utils::logging;

/// 应用主结构
///
/// 唯一持有 Browser 与 Engine 的地方
pub struct App {
    config: Config,
    browser: Browser,
    engine: Engine,
}

impl App {
    /// 初始化应用：获取浏览器会话并构建引擎
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(config.sweep_start, config.sweep_end, &config.target_year);

        let (browser, page) = if config.browser_debug_port > 0 {
            browser::connect_to_browser_and_page(
                config.browser_debug_port,
                &config.store_url,
                &config.store_domain,
            )
            .await?
        } else {
            browser::launch_headless_browser(&config.store_url, config.chrome_executable.as_deref())
                .await?
        };

        let engine = Engine::new(page, &config);

        Ok(Self {
            config,
            browser,
            engine,
        })
    }

    /// 运行整次扫描并输出最终统计
    pub async fn run(mut self) -> Result<RunCounters> {
        let sweep = Sweep::new(self.config.clone());
        let counters = sweep.run(&self.engine).await;

        let failed_symbols = counters.symbols.iter().filter(|s| s.failed).count();
        logging::print_final_stats(counters.total_matches, failed_symbols);

        // 自行启动的浏览器随运行结束关闭；连接来的浏览器留给用户
        if self.config.browser_debug_port == 0 {
            if let Err(e) = self.browser.close().await {
                warn!("关闭浏览器失败: {}", e);
            } else {
                info!("✅ 浏览器已关闭");
            }
        }

        Ok(counters)
    }
}
