use crate::internal::video::downloader::traits::download::{DownloadHook, HookAbort};

/// 钩子容器：按注册顺序依次执行。
#[derive(Default)]
pub struct DownloadHooksContainer {
    hooks: Vec<Box<dyn DownloadHook>>,
}

impl DownloadHooksContainer {
    /// 添加一个下载钩子；支持多次调用以注册多个钩子。
    pub fn add(&mut self, hook: impl DownloadHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub async fn run_before_start(&mut self) -> Result<(), HookAbort> {
        for h in self.hooks.iter_mut() {
            h.before_start().await?;
        }
        Ok(())
    }

    pub fn run_on_chunk(&mut self, chunk: &[u8]) {
        for h in self.hooks.iter_mut() {
            h.on_chunk(chunk);
        }
    }

    pub fn run_on_progress(&mut self, bytes_done: u64, total: Option<u64>) {
        for h in self.hooks.iter_mut() {
            h.on_progress(bytes_done, total);
        }
    }

    pub async fn run_after_complete(&mut self) {
        for h in self.hooks.iter_mut() {
            h.after_complete().await;
        }
    }

    pub fn run_on_failed(&mut self, message: &str) {
        for h in self.hooks.iter_mut() {
            h.on_failed(message);
        }
    }
}

impl std::fmt::Debug for DownloadHooksContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadHooksContainer")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
