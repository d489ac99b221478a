use std::time::Duration;

/// 开始后多久把进度抬到 1%（毫秒）
pub const DEFAULT_STARTING_BUMP_DELAY_MS: u64 = 300;

/// 开始后抬升到的进度
pub const DEFAULT_STARTING_BUMP_VALUE: f64 = 1.0;

/// 起步递增的周期（毫秒）
pub const DEFAULT_STARTING_TICK_INTERVAL_MS: u64 = 100;

/// 起步递增的步长
pub const DEFAULT_STARTING_TICK_STEP: f64 = 0.5;

/// 起步递增的上限
pub const DEFAULT_STARTING_TICK_CAP: f64 = 10.0;

/// 总大小已知时，传输中允许显示的最大进度；最后 2% 留给完成事件
pub const DEFAULT_KNOWN_TOTAL_CAP: f64 = 98.0;

/// 新的真实进度至少要超出当前值这么多才会被采纳
pub const DEFAULT_ACCEPT_THRESHOLD: f64 = 1.0;

/// 真实进度变化太小时的微调步长
pub const DEFAULT_NUDGE_STEP: f64 = 0.2;

/// 超过该进度后不再微调
pub const DEFAULT_NUDGE_CEILING: f64 = 95.0;

/// 总大小未知时每个事件的递增步长
pub const DEFAULT_UNKNOWN_TOTAL_STEP: f64 = 0.5;

/// 总大小未知时的进度上限
pub const DEFAULT_UNKNOWN_TOTAL_CAP: f64 = 90.0;

/// 100% 展示保持期（毫秒）
pub const DEFAULT_FINALIZE_HOLD_MS: u64 = 800;

/// 完成后回到空闲前的保持期（毫秒）
pub const DEFAULT_COMPLETE_HOLD_MS: u64 = 1500;

/// 进度估算的调参项。
///
/// 这些数值只影响观感，不影响正确性：无论怎么调，进度都保持单调不减，
/// 且传输中不会超过 `known_total_cap` / `unknown_total_cap`。
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    pub starting_bump_delay: Duration,
    pub starting_bump_value: f64,
    pub starting_tick_interval: Duration,
    pub starting_tick_step: f64,
    pub starting_tick_cap: f64,
    pub known_total_cap: f64,
    pub accept_threshold: f64,
    pub nudge_step: f64,
    pub nudge_ceiling: f64,
    pub unknown_total_step: f64,
    pub unknown_total_cap: f64,
    pub finalize_hold: Duration,
    pub complete_hold: Duration,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            starting_bump_delay: Duration::from_millis(DEFAULT_STARTING_BUMP_DELAY_MS),
            starting_bump_value: DEFAULT_STARTING_BUMP_VALUE,
            starting_tick_interval: Duration::from_millis(DEFAULT_STARTING_TICK_INTERVAL_MS),
            starting_tick_step: DEFAULT_STARTING_TICK_STEP,
            starting_tick_cap: DEFAULT_STARTING_TICK_CAP,
            known_total_cap: DEFAULT_KNOWN_TOTAL_CAP,
            accept_threshold: DEFAULT_ACCEPT_THRESHOLD,
            nudge_step: DEFAULT_NUDGE_STEP,
            nudge_ceiling: DEFAULT_NUDGE_CEILING,
            unknown_total_step: DEFAULT_UNKNOWN_TOTAL_STEP,
            unknown_total_cap: DEFAULT_UNKNOWN_TOTAL_CAP,
            finalize_hold: Duration::from_millis(DEFAULT_FINALIZE_HOLD_MS),
            complete_hold: Duration::from_millis(DEFAULT_COMPLETE_HOLD_MS),
        }
    }
}

impl EstimatorConfig {
    /// 同时设置两段展示保持期
    pub fn with_holds(mut self, finalize_hold: Duration, complete_hold: Duration) -> Self {
        self.finalize_hold = finalize_hold;
        self.complete_hold = complete_hold;
        self
    }

    pub fn with_nudge_step(mut self, nudge_step: f64) -> Self {
        self.nudge_step = nudge_step;
        self
    }

    pub fn with_starting_tick_cap(mut self, cap: f64) -> Self {
        self.starting_tick_cap = cap;
        self
    }
}
