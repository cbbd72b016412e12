use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 浏览器引擎相关错误
    Engine(EngineError),
    /// 表格写入端相关错误
    Sink(SinkError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Engine(e) => write!(f, "引擎错误: {}", e),
            AppError::Sink(e) => write!(f, "表格错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Engine(e) => Some(e),
            AppError::Sink(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 浏览器引擎错误
#[derive(Debug)]
pub enum EngineError {
    /// 操作超时（导航、等待选择器等）
    Timeout { op: String, timeout_ms: u64 },
    /// 导航失败
    NavigationFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 选择器未命中
    SelectorNotFound { selector: String },
    /// 执行脚本失败
    ScriptFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 无法读取当前 URL
    UrlUnavailable,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Timeout { op, timeout_ms } => {
                write!(f, "操作超时 ({}): {} ms", op, timeout_ms)
            }
            EngineError::NavigationFailed { url, source } => {
                write!(f, "导航到 {} 失败: {}", url, source)
            }
            EngineError::SelectorNotFound { selector } => {
                write!(f, "选择器未命中: {}", selector)
            }
            EngineError::ScriptFailed { source } => {
                write!(f, "执行脚本失败: {}", source)
            }
            EngineError::UrlUnavailable => write!(f, "无法读取当前页面 URL"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::NavigationFailed { source, .. } | EngineError::ScriptFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 表格写入端错误
#[derive(Debug)]
pub enum SinkError {
    /// 网络请求失败
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 返回错误响应
    BadResponse {
        endpoint: String,
        status: u16,
        body: String,
    },
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::RequestFailed { endpoint, source } => {
                write!(f, "表格请求失败 ({}): {}", endpoint, source)
            }
            SinkError::BadResponse {
                endpoint,
                status,
                body,
            } => {
                write!(
                    f,
                    "表格返回错误响应 ({}): status={}, body={}",
                    endpoint, status, body
                )
            }
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SinkError::RequestFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        AppError::Engine(err)
    }
}

impl From<SinkError> for AppError {
    fn from(err: SinkError) -> Self {
        AppError::Sink(err)
    }
}

// ========== 从常见错误类型转换 ==========
// 注意：anyhow 已经为所有实现了 std::error::Error 的类型提供了自动转换

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Engine(EngineError::ScriptFailed {
            source: Box::new(err),
        })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        AppError::Sink(SinkError::RequestFailed {
            endpoint,
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Other(format!("JSON 处理失败: {}", err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建超时错误
    pub fn timeout(op: impl Into<String>, timeout_ms: u64) -> Self {
        AppError::Engine(EngineError::Timeout {
            op: op.into(),
            timeout_ms,
        })
    }

    /// 创建导航失败错误
    pub fn navigation_failed(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Engine(EngineError::NavigationFailed {
            url: url.into(),
            source: Box::new(source),
        })
    }

    /// 创建选择器未命中错误
    pub fn selector_not_found(selector: impl Into<String>) -> Self {
        AppError::Engine(EngineError::SelectorNotFound {
            selector: selector.into(),
        })
    }

    /// 判断是否为超时类错误（用于恢复路径分类）
    pub fn is_timeout(&self) -> bool {
        matches!(self, AppError::Engine(EngineError::Timeout { .. }))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_classification() {
        let err = AppError::timeout("wait_for_navigation", 120_000);
        assert!(err.is_timeout());

        let err = AppError::selector_not_found("input[type=\"search\"]");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_display_contains_context() {
        let err = AppError::timeout("goto", 30_000);
        let msg = err.to_string();
        assert!(msg.contains("goto"));
        assert!(msg.contains("30000"));
    }
}
