use super::timer_effect::TimerKind;

/// 驱动状态机的输入事件
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// 发起一次新的传输
    Start,
    /// 传输层的原始进度；`total` 未知时为 `None`
    Progress { loaded: u64, total: Option<u64> },
    /// 字节已全部收齐并交给消费方
    Succeeded,
    /// 任意阶段的失败
    Failed { message: String },
    /// 回到空闲状态，重复调用结果相同
    Reset,
    /// 之前调度的定时器到期
    TimerElapsed(TimerKind),
}
