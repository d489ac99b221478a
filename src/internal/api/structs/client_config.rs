use std::time::Duration;

/// 默认的服务地址
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/";

/// 覆盖服务地址的环境变量
pub const BASE_URL_ENV: &str = "VIDEO_GRAB_API_URL";

/// 默认连接超时（秒）
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// 默认元数据请求超时（秒）；下载请求不设整体超时
pub const DEFAULT_METADATA_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// `None` 表示元数据请求不设超时
    pub metadata_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            metadata_timeout: Some(Duration::from_secs(DEFAULT_METADATA_TIMEOUT_SECS)),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// 默认配置，服务地址可由环境变量 [`BASE_URL_ENV`] 覆盖
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn with_metadata_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.metadata_timeout = timeout;
        self
    }
}
