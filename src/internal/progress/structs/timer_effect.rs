use std::time::Duration;

use super::progress_event::ProgressEvent;

/// 状态机使用的定时器种类，每种同一时刻最多存在一个
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// 开始后延迟把进度抬到 1%
    StartingBump,
    /// 收到真实进度前的周期性小幅递增
    StartingTick,
    /// 100% 的展示保持期，结束后才把结果交给调用方
    FinalizeHold,
    /// 完成后的展示保持期，结束后回到 Idle
    CompleteHold,
}

impl TimerKind {
    /// 定时器到期时投递给状态机的事件
    pub fn elapsed_event(self) -> ProgressEvent {
        ProgressEvent::TimerElapsed(self)
    }
}

/// 状态机产出的副作用，由运行时驱动（[`TransferTracker`](super::TransferTracker)）执行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEffect {
    /// 一次性定时器；同种类已存在时先取消旧的
    Schedule { timer: TimerKind, after: Duration },
    /// 周期定时器，第一次触发在 `every` 之后
    Repeat { timer: TimerKind, every: Duration },
    Cancel(TimerKind),
    CancelAll,
}
