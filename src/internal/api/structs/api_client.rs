use core::fmt;
use std::sync::Arc;

use reqwest::Client;
use url::Url;

use crate::internal::api::enums::ApiEndpoint;
use crate::internal::errors::ApiClientError;

use super::client_config::ClientConfig;

/// 远程视频服务客户端
///
/// 该结构体定位
/// - 持有共享的 HTTP 客户端与服务地址
/// - 供 [`Video`](crate::video::Video) 和下载器访问远程接口
///
/// Clone 很便宜：`Client` 内部是 Arc，其余字段也都是 Arc。
#[derive(Clone)]
pub struct ApiClient {
    pub client: Client,
    pub base_url: Arc<Url>,
    pub config: Arc<ClientConfig>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiClientError> {
        let base_url = format_base_url(&config.base_url)?;

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: Arc::new(base_url),
            config: Arc::new(config),
        })
    }

    /// 只指定服务地址，其余使用默认配置
    pub fn from_base_url(base_url: &str) -> Result<Self, ApiClientError> {
        Self::new(ClientConfig::new(base_url))
    }

    /// 接口的完整地址
    pub fn endpoint(&self, endpoint: ApiEndpoint) -> Result<Url, url::ParseError> {
        self.base_url.join(endpoint.path())
    }
}

impl PartialEq for ApiClient {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url
    }
}

/// 不打印 reqwest 客户端内部细节
impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

/// 保证服务地址以 "/" 结尾，否则 join 会吃掉最后一段路径
fn format_base_url(url: &str) -> Result<Url, url::ParseError> {
    let mut base_url = Url::parse(url.trim())?;

    if !base_url.path().ends_with('/') {
        let new_path = format!("{}/", base_url.path());
        base_url.set_path(&new_path);
    }

    Ok(base_url)
}
