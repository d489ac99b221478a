/// 一次传输所处的生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransferPhase {
    /// 没有进行中的传输
    #[default]
    Idle,
    /// 已发起请求，尚未收到第一条真实进度
    Starting,
    /// 正在接收字节
    Transferring,
    /// 已收齐全部字节，显示 100% 的保持期
    Finalizing,
    /// 结果已交给调用方，短暂保持后回到 Idle
    Complete,
    /// 传输失败（终态，需重新开始）
    Failed,
}

impl TransferPhase {
    /// 是否仍在接收进度事件
    pub fn is_active(&self) -> bool {
        matches!(self, TransferPhase::Starting | TransferPhase::Transferring)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferPhase::Idle => "idle",
            TransferPhase::Starting => "starting",
            TransferPhase::Transferring => "transferring",
            TransferPhase::Finalizing => "finalizing",
            TransferPhase::Complete => "complete",
            TransferPhase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
