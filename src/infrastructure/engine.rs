//! 引擎适配器 - 基础设施层
//!
//! 持有唯一的 page 资源，向上层暴露带超时上界的类型化操作。
//! 所有导航/等待都有超时，超时以独立的错误类别上报，供恢复路径分类。

use std::future::Future;
use std::time::{Duration, Instant};

use chromiumoxide::error::CdpError;
use chromiumoxide::{Element, Page};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// 轮询选择器的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// 引擎适配器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露导航 / 等待 / 查询 / 执行 JS 的能力
/// - 不认识扫描流程，不认识数据模型
pub struct Engine {
    page: Page,
    nav_timeout: Duration,
    selector_timeout: Duration,
}

impl Engine {
    /// 创建新的引擎适配器
    pub fn new(page: Page, config: &Config) -> Self {
        Self {
            page,
            nav_timeout: Duration::from_millis(config.nav_timeout_ms),
            selector_timeout: Duration::from_millis(config.selector_timeout_ms),
        }
    }

    // ========== 导航 ==========

    /// 导航到指定 URL（含超时）
    pub async fn goto(&self, url: &str) -> AppResult<()> {
        debug!("导航: {}", url);
        match timeout(self.nav_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(AppError::navigation_failed(url, e)),
            Err(_) => Err(AppError::timeout(
                format!("goto {}", url),
                self.nav_timeout.as_millis() as u64,
            )),
        }
    }

    /// 重新加载当前页面
    pub async fn reload(&self) -> AppResult<()> {
        self.bounded("reload", self.nav_timeout, self.page.reload())
            .await?;
        Ok(())
    }

    /// 等待下一次导航完成
    pub async fn wait_for_navigation(&self) -> AppResult<()> {
        self.bounded(
            "wait_for_navigation",
            self.nav_timeout,
            self.page.wait_for_navigation(),
        )
        .await?;
        Ok(())
    }

    /// 后退一页并等待导航完成
    ///
    /// 通过页面内 history.back() 触发，没有单独的 CDP 往返
    pub async fn go_back(&self) -> AppResult<()> {
        debug!("后退到上一页");
        // 脚本末尾的 true 保证 evaluate 有值可取
        self.eval("history.back(); true").await?;
        self.wait_for_navigation().await
    }

    /// 读取当前页面 URL
    pub async fn current_url(&self) -> AppResult<String> {
        self.page
            .url()
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::Engine(crate::error::EngineError::UrlUnavailable))
    }

    // ========== 查询与等待 ==========

    /// 等待选择器出现（轮询 + 截止时间）
    pub async fn wait_for_selector(&self, selector: &str) -> AppResult<Element> {
        self.wait_for_selector_within(selector, self.selector_timeout)
            .await
    }

    /// 等待选择器出现，使用调用方给定的超时
    pub async fn wait_for_selector_within(
        &self,
        selector: &str,
        max_wait: Duration,
    ) -> AppResult<Element> {
        let deadline = Instant::now() + max_wait;
        loop {
            if let Ok(element) = self.page.find_element(selector).await {
                return Ok(element);
            }
            if Instant::now() >= deadline {
                return Err(AppError::timeout(
                    format!("wait_for_selector {}", selector),
                    max_wait.as_millis() as u64,
                ));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// 查询全部命中的元素（未命中返回空集，不报错）
    pub async fn query_all(&self, selector: &str) -> Vec<Element> {
        self.page
            .find_elements(selector)
            .await
            .unwrap_or_default()
    }

    /// 查询首个命中的元素
    pub async fn query_first(&self, selector: &str) -> Option<Element> {
        self.page.find_element(selector).await.ok()
    }

    // ========== 交互 ==========

    /// 点击元素并等待随之而来的导航
    pub async fn click_and_wait(&self, element: &Element) -> AppResult<()> {
        element.click().await.map_err(AppError::from)?;
        self.wait_for_navigation().await
    }

    /// 逐字符输入文本（带按键间隔，模拟真实输入）
    pub async fn type_slow(&self, element: &Element, text: &str, delay_ms: u64) -> AppResult<()> {
        for ch in text.chars() {
            element
                .type_str(ch.to_string())
                .await
                .map_err(AppError::from)?;
            sleep(Duration::from_millis(delay_ms)).await;
        }
        Ok(())
    }

    /// 对元素按下回车并等待导航
    pub async fn press_enter_and_wait(&self, element: &Element) -> AppResult<()> {
        element.press_key("Enter").await.map_err(AppError::from)?;
        self.wait_for_navigation().await
    }

    /// 将元素滚动到视口中央
    pub async fn scroll_into_view(&self, element: &Element) -> AppResult<()> {
        element.scroll_into_view().await.map_err(AppError::from)?;
        Ok(())
    }

    /// 向下滚动一个视口高度（触发懒加载）
    pub async fn scroll_viewport(&self) -> AppResult<()> {
        self.eval("window.scrollBy(0, window.innerHeight); true")
            .await?;
        Ok(())
    }

    // ========== 脚本执行 ==========

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self
            .page
            .evaluate(js_code.into())
            .await
            .map_err(AppError::from)?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    // ========== 页面内容 ==========

    /// 获取当前页面的完整 HTML
    pub async fn page_html(&self) -> AppResult<String> {
        self.page.content().await.map_err(AppError::from)
    }

    /// 固定沉降延迟
    ///
    /// 仅在没有可观察完成信号的场景使用（布局/懒加载），其余等待
    /// 一律走 wait_for_selector / wait_for_navigation
    pub async fn settle(&self, ms: u64) {
        sleep(Duration::from_millis(ms)).await;
    }

    // ========== 内部辅助 ==========

    async fn bounded<'a, F>(&self, op: &str, dur: Duration, fut: F) -> AppResult<&'a Page>
    where
        F: Future<Output = Result<&'a Page, CdpError>>,
    {
        match timeout(dur, fut).await {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) => Err(AppError::from(e)),
            Err(_) => Err(AppError::timeout(op, dur.as_millis() as u64)),
        }
    }
}
