use anyhow::Result;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use super::DESKTOP_USER_AGENT;

/// 连接到已运行浏览器的调试端口并获取页面
///
/// 优先复用已经停留在商店域名上的标签页，否则新建页面并导航
pub async fn connect_to_browser_and_page(
    port: u16,
    target_url: &str,
    store_domain: &str,
) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        e
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser.pages().await?;
    debug!("获取到 {} 个页面", pages.len());

    // 查找已经在商店域名上的标签页
    for p in pages.iter() {
        if let Ok(Some(url)) = p.url().await {
            debug!("检查页面 URL: {}", url);
            if url.contains(store_domain) {
                info!("✓ 复用已打开的商店页面: {}", url);
                return Ok((browser, p.clone()));
            }
        }
    }

    // 未找到则新建页面并导航
    debug!("未找到商店页面，创建新页面");
    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建新页面失败: {}", e);
        e
    })?;
    page.set_user_agent(DESKTOP_USER_AGENT).await?;
    page.goto(target_url).await.map_err(|e| {
        error!("导航到 {} 失败: {}", target_url, e);
        e
    })?;
    info!("已导航到: {}", target_url);

    Ok((browser, page))
}
