//! 闭包钩子：`VideoDownloader::with_*_hook` 传入的闭包在这里包装成 [`DownloadHook`]，
//! 每个适配器只覆盖一个阶段，其余阶段沿用 trait 的空实现。

use std::future::Future;

use async_trait::async_trait;

use crate::internal::video::downloader::traits::download::{DownloadHook, HookAbort};

/// 同步阶段的适配器：闭包签名与 trait 方法参数一一对应。
macro_rules! sync_hook_adapter {
    ($(#[$doc:meta])* $name:ident, $method:ident($($arg:ident: $ty:ty),*)) => {
        $(#[$doc])*
        pub(crate) struct $name<F>(pub(crate) F);

        #[async_trait]
        impl<F> DownloadHook for $name<F>
        where
            F: FnMut($($ty),*) + Send + Sync + 'static,
        {
            fn $method(&mut self, $($arg: $ty),*) {
                (self.0)($($arg),*);
            }
        }
    };
}

sync_hook_adapter!(
    /// 每收到一块数据调用，拿到的是原始字节
    OnChunkHookAdapter,
    on_chunk(chunk: &[u8])
);

sync_hook_adapter!(
    /// 已下载字节数与总大小（无 Content-Length 时为 `None`）
    OnProgressHookAdapter,
    on_progress(bytes_done: u64, total: Option<u64>)
);

sync_hook_adapter!(
    /// 传输开始后失败时调用，参数与追踪器里的失败提示相同
    OnFailedHookAdapter,
    on_failed(message: &str)
);

/// 返回 `Err` 时下载在发请求前中止，追踪器记为失败。
pub(crate) struct BeforeStartHookAdapter<F>(pub(crate) F);

#[async_trait]
impl<F, Fut> DownloadHook for BeforeStartHookAdapter<F>
where
    F: FnMut() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HookAbort>> + Send + 'static,
{
    async fn before_start(&mut self) -> Result<(), HookAbort> {
        let pending = (self.0)();
        pending.await
    }
}

/// 字节全部落地之后、进入 100% 保持期之前执行。
pub(crate) struct AfterCompleteHookAdapter<F>(pub(crate) F);

#[async_trait]
impl<F, Fut> DownloadHook for AfterCompleteHookAdapter<F>
where
    F: FnMut() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn after_complete(&mut self) {
        let pending = (self.0)();
        pending.await;
    }
}
