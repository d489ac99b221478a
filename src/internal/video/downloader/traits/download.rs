//! 下载钩子：在「开始前 / 每块数据 / 进度 / 完成后 / 失败后」插入自定义逻辑。

use async_trait::async_trait;

/// 钩子在开始前请求中止下载时使用的错误。
#[derive(Debug, Clone)]
pub struct HookAbort {
    pub reason: Option<String>,
}

impl HookAbort {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }
}

impl std::fmt::Display for HookAbort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "下载被钩子中止: {reason}"),
            None => f.write_str("下载被钩子中止"),
        }
    }
}

impl std::error::Error for HookAbort {}

/// 下载流程钩子。
///
/// 使用方式二选一（可混用）：
/// - **单阶段**：用 `with_before_start_hook` / `with_on_chunk_hook` / `with_on_progress_hook` / `with_after_complete_hook` 传入闭包；
/// - **完整钩子**：实现本 trait，通过下载器的 `with_hook` 注册。
///
/// 进度钩子拿到的是原始字节数；平滑后的百分比请监听下载器的 `tracker()`。
#[async_trait]
pub trait DownloadHook: Send + Sync {
    /// 发起请求前调用。返回 `Err` 则中止本次下载。
    async fn before_start(&mut self) -> Result<(), HookAbort> {
        Ok(())
    }

    fn on_chunk(&mut self, _chunk: &[u8]) {}

    /// 累计已下载字节、总大小（响应未带长度时为 `None`）。
    fn on_progress(&mut self, _bytes_done: u64, _total: Option<u64>) {}

    /// 字节全部落地后、100% 保持期之前调用。
    async fn after_complete(&mut self) {}

    /// 传输开始后任意一步失败时调用，参数为给用户的提示。
    fn on_failed(&mut self, _message: &str) {}
}
