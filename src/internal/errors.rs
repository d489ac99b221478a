//! 错误类型：输入校验、元数据获取、传输三类，均为终态，不自动重试。

use reqwest::StatusCode;
use thiserror::Error;

use crate::internal::video::downloader::traits::download::HookAbort;

/// 元数据请求失败时，服务端没有给出原因时使用的提示
pub const DEFAULT_METADATA_FAILURE_MESSAGE: &str = "获取视频信息失败";

/// 下载失败时给调用方的统一提示
pub const DEFAULT_TRANSFER_FAILURE_MESSAGE: &str = "下载失败，请重试或检查网络连接";

/// 构建 [`ApiClient`](crate::api::ApiClient) 失败
#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("服务地址格式错误: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("创建 HTTP 客户端失败: {0}")]
    Build(#[from] reqwest::Error),
}

/// 请求发出之前就被拒绝的输入
#[derive(Debug, Error)]
pub enum InputValidationError {
    #[error("请输入视频链接")]
    EmptyUrl,

    #[error("视频链接格式错误: {0}")]
    MalformedUrl(#[from] url::ParseError),

    #[error("不支持的链接协议: {0}")]
    UnsupportedScheme(String),
}

/// 远程查询视频信息失败
#[derive(Debug, Error)]
pub enum MetadataFetchError {
    #[error("接口地址错误: {0}")]
    Endpoint(#[source] url::ParseError),

    #[error("HTTP 请求失败: {0}")]
    Request(#[source] reqwest::Error),

    /// 服务端返回非成功状态；`message` 取自响应体的 `message` 字段
    #[error("服务端拒绝请求（{status}）: {}", message.as_deref().unwrap_or(DEFAULT_METADATA_FAILURE_MESSAGE))]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("解析视频信息失败: {0}")]
    Decode(#[source] reqwest::Error),
}

/// 下载流中途失败
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("接口地址错误: {0}")]
    Endpoint(#[source] url::ParseError),

    #[error("HTTP 请求失败: {0}")]
    Request(#[source] reqwest::Error),

    #[error("服务端返回异常状态: {0}")]
    Status(StatusCode),

    #[error("读取数据流失败: {0}")]
    Stream(#[source] reqwest::Error),

    #[error("未设置保存路径且未开启 output_bytes")]
    NoDestination,

    #[error("创建文件失败: {0}")]
    CreateFile(#[source] std::io::Error),

    #[error("写入文件失败: {0}")]
    WriteFile(#[source] std::io::Error),

    /// 钩子在 before_start 中返回错误，中止下载。
    #[error("{0}")]
    HookAbort(#[from] HookAbort),
}

/// 对外统一的错误类型
#[derive(Debug, Error)]
pub enum VideoError {
    #[error("{0}")]
    InputValidation(#[from] InputValidationError),

    #[error("{0}")]
    MetadataFetch(#[from] MetadataFetchError),

    #[error("{0}")]
    Transfer(#[from] TransferError),
}

impl VideoError {
    /// 直接展示给用户的一句话提示
    pub fn user_message(&self) -> String {
        match self {
            VideoError::InputValidation(e) => e.to_string(),
            VideoError::MetadataFetch(e) => e.user_message(),
            VideoError::Transfer(e) => e.user_message(),
        }
    }
}

impl MetadataFetchError {
    pub fn user_message(&self) -> String {
        match self {
            MetadataFetchError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => DEFAULT_METADATA_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl TransferError {
    pub fn user_message(&self) -> String {
        match self {
            TransferError::NoDestination | TransferError::HookAbort(_) => self.to_string(),
            _ => DEFAULT_TRANSFER_FAILURE_MESSAGE.to_string(),
        }
    }
}
