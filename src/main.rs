use anyhow::Result;
use shopify_app_sweep::utils::logging;
use shopify_app_sweep::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（sweep.toml 优先，否则环境变量）
    let config = Config::load();

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let _counters = App::initialize(config).await?.run().await?;

    Ok(())
}
