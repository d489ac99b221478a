use super::transfer_phase::TransferPhase;

/// 单次传输的全部可见状态。
///
/// 下载中 / 出错 / 进度不再是几个独立开关，而是收拢在同一个值里，
/// 由 [`ProgressEstimator`](super::ProgressEstimator) 统一推进，避免出现「仍在下载但进度已清零」这类组合。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransferState {
    /// 对外展示的进度（0～100），传输进行中单调不减
    pub reported_progress: f64,
    /// 最近一次进度事件是否带有可用的总大小
    pub has_length_info: bool,
    pub phase: TransferPhase,
    /// 失败原因，仅在 `Failed` 阶段为 `Some`
    pub failure: Option<String>,
}

impl TransferState {
    /// 空闲状态：进度 0，无失败信息
    pub fn idle() -> Self {
        Self::default()
    }

    /// 进度取整后的百分比，便于直接显示
    pub fn percent(&self) -> u8 {
        self.reported_progress.round().clamp(0.0, 100.0) as u8
    }

    /// 进度比例（0.0～1.0），适合直接喂给进度条控件
    pub fn fraction(&self) -> f64 {
        (self.reported_progress / 100.0).clamp(0.0, 1.0)
    }

    /// 界面是否应显示进度条
    pub fn is_visible(&self) -> bool {
        !matches!(self.phase, TransferPhase::Idle | TransferPhase::Failed)
    }
}
