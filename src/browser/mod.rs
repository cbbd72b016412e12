//! 浏览器会话获取
//!
//! 两种模式：自行启动无头浏览器，或连接到已运行浏览器的调试端口

pub mod connection;
pub mod headless;

pub use connection::connect_to_browser_and_page;
pub use headless::launch_headless_browser;

/// 模拟桌面 Chrome 的 User-Agent（商店对无头默认 UA 返回精简页面）
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120 Safari/537.36";
