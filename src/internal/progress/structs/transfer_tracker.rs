//! 传输进度追踪器：状态机的运行时驱动。
//!
//! 追踪器持有一份 [`TransferState`]（以响应式属性发布），把外部事件交给
//! [`ProgressEstimator`] 求出新状态，再用 tokio 定时任务执行返回的 [`TimerEffect`]。
//!
//! ## 定时器
//!
//! - 每种 [`TimerKind`] 同一时刻最多一个任务，登记时附带递增的令牌；
//! - 取消即 `abort` 并移除登记；已经醒来、但令牌不再匹配的任务会被丢弃，
//!   所以失败后不会再有残留的保持期把状态改回去；
//! - 定时任务只持有弱引用，最后一个追踪器句柄释放时全部中止；
//! - 定时任务跑在创建时所在的 tokio 运行时上（或 [`TransferTracker::with_runtime`] 指定的运行时），
//!   所以界面线程等非运行时线程也可以直接调用 `start` / `progress`。两者都没有时
//!   只做状态转移、不安排定时器，不会 panic。
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! use video_grab::progress::{TransferPhase, TransferTracker};
//!
//! # async fn example() {
//! let tracker = TransferTracker::default();
//! let mut watcher = tracker.watch();
//! tokio::spawn(async move {
//!     while let Ok(state) = watcher.changed().await {
//!         println!("{} {:.1}%", state.phase, state.reported_progress);
//!     }
//! });
//!
//! tracker.start();
//! tracker.progress(512, Some(1024));
//! tracker.finish().await;
//! assert_eq!(tracker.snapshot().phase, TransferPhase::Complete);
//! # }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use log::{debug, warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

use crate::internal::states::unlock_reactive::{PropertyWatcher, UnlockReactiveProperty};

use super::estimator_config::EstimatorConfig;
use super::progress_estimator::{ProgressEstimator, Transition};
use super::progress_event::ProgressEvent;
use super::timer_effect::{TimerEffect, TimerKind};
use super::transfer_phase::TransferPhase;
use super::transfer_state::TransferState;

struct TimerSlot {
    token: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct TimerSlots {
    next_token: u64,
    slots: HashMap<TimerKind, TimerSlot>,
}

impl TimerSlots {
    fn cancel(&mut self, timer: TimerKind) {
        if let Some(slot) = self.slots.remove(&timer) {
            slot.handle.abort();
        }
    }

    fn cancel_all(&mut self) {
        for (_, slot) in self.slots.drain() {
            slot.handle.abort();
        }
    }

    fn issue_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }
}

impl Drop for TimerSlots {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

struct TrackerInner {
    estimator: ProgressEstimator,
    /// 定时任务所用的运行时；`None` 时每次安排定时器再尝试当前线程的运行时
    runtime: Option<Handle>,
    state: UnlockReactiveProperty<TransferState>,
    /// 同时充当事件串行化的锁：整个转移过程都在锁内完成
    timers: Mutex<TimerSlots>,
}

/// 单次传输的进度追踪器；`Clone` 得到的是同一份状态的句柄。
#[derive(Clone)]
pub struct TransferTracker {
    inner: Arc<TrackerInner>,
}

impl Default for TransferTracker {
    fn default() -> Self {
        Self::new(EstimatorConfig::default())
    }
}

impl std::fmt::Debug for TransferTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferTracker")
            .field("state", &self.snapshot())
            .finish()
    }
}

impl TransferTracker {
    /// 在 tokio 运行时内创建时记住该运行时，之后从任意线程投递事件都可以安排定时器。
    pub fn new(config: EstimatorConfig) -> Self {
        Self::build(config, Handle::try_current().ok())
    }

    /// 显式指定定时任务所用的运行时，适合在运行时之外（例如界面线程）创建追踪器。
    pub fn with_runtime(config: EstimatorConfig, runtime: Handle) -> Self {
        Self::build(config, Some(runtime))
    }

    fn build(config: EstimatorConfig, runtime: Option<Handle>) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                estimator: ProgressEstimator::new(config),
                runtime,
                state: UnlockReactiveProperty::new(TransferState::idle()),
                timers: Mutex::new(TimerSlots::default()),
            }),
        }
    }

    pub fn config(&self) -> &EstimatorConfig {
        self.inner.estimator.config()
    }

    /// 共享的状态属性；`.watch()` 后 `changed().await` 监听每一次变化。
    pub fn state(&self) -> UnlockReactiveProperty<TransferState> {
        self.inner.state.clone()
    }

    pub fn watch(&self) -> PropertyWatcher<TransferState> {
        self.inner.state.watch()
    }

    pub fn snapshot(&self) -> TransferState {
        self.inner.state.get_or_default()
    }

    /// 当前仍在等待的定时器数量
    pub fn pending_timers(&self) -> usize {
        self.lock_timers().slots.len()
    }

    pub fn start(&self) -> TransferState {
        self.dispatch(ProgressEvent::Start)
    }

    pub fn progress(&self, loaded: u64, total: Option<u64>) -> TransferState {
        self.dispatch(ProgressEvent::Progress { loaded, total })
    }

    pub fn succeed(&self) -> TransferState {
        self.dispatch(ProgressEvent::Succeeded)
    }

    pub fn fail(&self, message: impl Into<String>) -> TransferState {
        self.dispatch(ProgressEvent::Failed {
            message: message.into(),
        })
    }

    pub fn reset(&self) -> TransferState {
        self.dispatch(ProgressEvent::Reset)
    }

    /// 标记成功并等待 100% 保持期结束，返回时状态已离开 `Finalizing`。
    ///
    /// 传输不在进行中时（例如已失败）直接返回当前状态；
    /// 没有运行时可安排保持期定时器时也直接返回，此时状态停在 `Finalizing`。
    pub async fn finish(&self) -> TransferState {
        let mut watcher = self.watch();
        let state = self.succeed();
        if state.phase != TransferPhase::Finalizing {
            return state;
        }
        if !self.lock_timers().slots.contains_key(&TimerKind::FinalizeHold) {
            return self.snapshot();
        }
        match watcher
            .wait_until(|s| s.phase != TransferPhase::Finalizing)
            .await
        {
            Ok(state) => state,
            Err(_) => self.snapshot(),
        }
    }

    /// 投递一个事件，返回转移后的状态。
    pub fn dispatch(&self, event: ProgressEvent) -> TransferState {
        let mut timers = self.lock_timers();
        self.apply(&mut timers, &event)
    }

    fn apply(&self, timers: &mut TimerSlots, event: &ProgressEvent) -> TransferState {
        let current = self.snapshot();
        let Transition { state, effects } = self.inner.estimator.transition(&current, event);

        for effect in effects {
            self.run_effect(timers, effect);
        }

        if state != current {
            if state.phase != current.phase {
                debug!(
                    "传输阶段 {} -> {}（进度 {:.1}%）",
                    current.phase, state.phase, state.reported_progress
                );
            }
            self.inner.state.update(state.clone());
        }
        state
    }

    fn runtime(&self) -> Option<Handle> {
        self.inner
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
    }

    fn run_effect(&self, timers: &mut TimerSlots, effect: TimerEffect) {
        match effect {
            TimerEffect::Schedule { timer, after } => {
                timers.cancel(timer);
                let Some(runtime) = self.runtime() else {
                    warn!("没有可用的 tokio 运行时，跳过定时器 {timer:?}");
                    return;
                };
                let token = timers.issue_token();
                let weak = Arc::downgrade(&self.inner);
                let handle = runtime.spawn(async move {
                    tokio::time::sleep(after).await;
                    fire(&weak, timer, token, true);
                });
                timers.slots.insert(timer, TimerSlot { token, handle });
            }
            TimerEffect::Repeat { timer, every } => {
                timers.cancel(timer);
                let Some(runtime) = self.runtime() else {
                    warn!("没有可用的 tokio 运行时，跳过定时器 {timer:?}");
                    return;
                };
                let token = timers.issue_token();
                let weak = Arc::downgrade(&self.inner);
                let every = every.max(Duration::from_millis(1));
                let handle = runtime.spawn(async move {
                    let mut ticker = interval_at(Instant::now() + every, every);
                    loop {
                        ticker.tick().await;
                        if !fire(&weak, timer, token, false) {
                            break;
                        }
                    }
                });
                timers.slots.insert(timer, TimerSlot { token, handle });
            }
            TimerEffect::Cancel(timer) => timers.cancel(timer),
            TimerEffect::CancelAll => timers.cancel_all(),
        }
    }

    fn lock_timers(&self) -> MutexGuard<'_, TimerSlots> {
        self.inner
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// 定时器到期回调；返回 `false` 表示定时器已失效，周期任务应退出。
fn fire(weak: &Weak<TrackerInner>, timer: TimerKind, token: u64, one_shot: bool) -> bool {
    let Some(inner) = weak.upgrade() else {
        return false;
    };
    let tracker = TransferTracker { inner };
    let mut timers = tracker.lock_timers();

    let is_current = timers
        .slots
        .get(&timer)
        .is_some_and(|slot| slot.token == token);
    if !is_current {
        return false;
    }
    if one_shot {
        // 任务即将结束，不需要 abort
        timers.slots.remove(&timer);
    }

    tracker.apply(&mut timers, &timer.elapsed_event());
    true
}
