//! 进度估算状态机。
//!
//! 纯函数实现：不读时钟、不起任务，所有等待都以 [`TimerEffect`] 的形式交给调用方调度，
//! 因此可以在没有真实定时器的情况下逐事件测试。
//!
//! ## 规则摘要
//!
//! - **Start**：进入 `Starting`，进度归零；延迟抬到 1%，并周期性小幅递增（有上限）
//! - **Progress**：第一条真实进度取消起步定时器并进入 `Transferring`
//!   - 总大小已知：候选值 `min(98, round(loaded * 100 / total))`，超出当前值 1 以上才采纳，
//!     否则在 95 以下微调 0.2
//!   - 总大小未知：每个事件固定递增，上限 90
//! - **Succeeded**：进度 100，进入 `Finalizing`，保持期结束后 `Complete`，再保持后回到 `Idle`
//! - **Failed**：任意阶段立即进度归零、进入 `Failed`，取消全部定时器
//! - **Reset**：回到 `Idle`，可重复调用
//!
//! 与当前阶段不匹配的事件（例如失败后才到期的保持定时器）不改变状态、不产生副作用。

use super::estimator_config::EstimatorConfig;
use super::progress_event::ProgressEvent;
use super::timer_effect::{TimerEffect, TimerKind};
use super::transfer_phase::TransferPhase;
use super::transfer_state::TransferState;

/// 一次状态转移的结果
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: TransferState,
    pub effects: Vec<TimerEffect>,
}

impl Transition {
    fn unchanged(state: &TransferState) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressEstimator {
    config: EstimatorConfig,
}

impl ProgressEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// 只关心新状态时的便捷方法
    pub fn step(&self, state: &TransferState, event: &ProgressEvent) -> TransferState {
        self.transition(state, event).state
    }

    pub fn transition(&self, state: &TransferState, event: &ProgressEvent) -> Transition {
        match event {
            ProgressEvent::Start => self.on_start(),
            ProgressEvent::Progress { loaded, total } => self.on_progress(state, *loaded, *total),
            ProgressEvent::Succeeded => self.on_succeeded(state),
            ProgressEvent::Failed { message } => Self::on_failed(message),
            ProgressEvent::Reset => Transition {
                state: TransferState::idle(),
                effects: vec![TimerEffect::CancelAll],
            },
            ProgressEvent::TimerElapsed(timer) => self.on_timer(state, *timer),
        }
    }

    fn on_start(&self) -> Transition {
        Transition {
            state: TransferState {
                phase: TransferPhase::Starting,
                ..TransferState::idle()
            },
            effects: vec![
                TimerEffect::CancelAll,
                TimerEffect::Schedule {
                    timer: TimerKind::StartingBump,
                    after: self.config.starting_bump_delay,
                },
                TimerEffect::Repeat {
                    timer: TimerKind::StartingTick,
                    every: self.config.starting_tick_interval,
                },
            ],
        }
    }

    fn on_progress(&self, state: &TransferState, loaded: u64, total: Option<u64>) -> Transition {
        if !state.phase.is_active() {
            return Transition::unchanged(state);
        }

        let mut effects = Vec::new();
        if state.phase == TransferPhase::Starting {
            effects.push(TimerEffect::Cancel(TimerKind::StartingTick));
            effects.push(TimerEffect::Cancel(TimerKind::StartingBump));
        }

        // total 为 0 或尚未收到任何字节时无法换算比例，按未知处理
        let known_total = total.filter(|&t| t > 0 && loaded > 0);
        let prev = state.reported_progress;
        let next = match known_total {
            Some(total) => self.known_total_progress(prev, loaded, total),
            None => raise(prev, self.config.unknown_total_step, self.config.unknown_total_cap),
        };

        Transition {
            state: TransferState {
                reported_progress: next,
                has_length_info: known_total.is_some(),
                phase: TransferPhase::Transferring,
                failure: None,
            },
            effects,
        }
    }

    fn known_total_progress(&self, prev: f64, loaded: u64, total: u64) -> f64 {
        let ratio = (loaded as f64 * 100.0 / total as f64).round();
        let candidate = ratio.min(self.config.known_total_cap);

        if candidate > prev + self.config.accept_threshold {
            candidate
        } else if prev < self.config.nudge_ceiling {
            prev + self.config.nudge_step
        } else {
            prev
        }
    }

    fn on_succeeded(&self, state: &TransferState) -> Transition {
        if !state.phase.is_active() {
            return Transition::unchanged(state);
        }
        Transition {
            state: TransferState {
                reported_progress: 100.0,
                has_length_info: state.has_length_info,
                phase: TransferPhase::Finalizing,
                failure: None,
            },
            effects: vec![
                TimerEffect::CancelAll,
                TimerEffect::Schedule {
                    timer: TimerKind::FinalizeHold,
                    after: self.config.finalize_hold,
                },
            ],
        }
    }

    fn on_failed(message: &str) -> Transition {
        Transition {
            state: TransferState {
                reported_progress: 0.0,
                has_length_info: false,
                phase: TransferPhase::Failed,
                failure: Some(message.to_string()),
            },
            effects: vec![TimerEffect::CancelAll],
        }
    }

    fn on_timer(&self, state: &TransferState, timer: TimerKind) -> Transition {
        match (timer, state.phase) {
            (TimerKind::StartingBump, TransferPhase::Starting) => Transition {
                state: TransferState {
                    reported_progress: state.reported_progress.max(self.config.starting_bump_value),
                    ..state.clone()
                },
                effects: Vec::new(),
            },
            (TimerKind::StartingTick, TransferPhase::Starting) => Transition {
                state: TransferState {
                    reported_progress: raise(
                        state.reported_progress,
                        self.config.starting_tick_step,
                        self.config.starting_tick_cap,
                    ),
                    ..state.clone()
                },
                effects: Vec::new(),
            },
            (TimerKind::FinalizeHold, TransferPhase::Finalizing) => Transition {
                state: TransferState {
                    phase: TransferPhase::Complete,
                    ..state.clone()
                },
                effects: vec![TimerEffect::Schedule {
                    timer: TimerKind::CompleteHold,
                    after: self.config.complete_hold,
                }],
            },
            (TimerKind::CompleteHold, TransferPhase::Complete) => Transition {
                state: TransferState::idle(),
                effects: vec![TimerEffect::CancelAll],
            },
            _ => Transition::unchanged(state),
        }
    }
}

/// 按步长递增但不超过上限；已经高于上限的值保持不动。
fn raise(prev: f64, step: f64, cap: f64) -> f64 {
    prev.max((prev + step).min(cap))
}
