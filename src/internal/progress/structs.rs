pub mod estimator_config;
pub mod progress_estimator;
pub mod progress_event;
pub mod timer_effect;
pub mod transfer_phase;
pub mod transfer_state;
pub mod transfer_tracker;

pub use estimator_config::EstimatorConfig;
pub use progress_estimator::{ProgressEstimator, Transition};
pub use progress_event::ProgressEvent;
pub use timer_effect::{TimerEffect, TimerKind};
pub use transfer_phase::TransferPhase;
pub use transfer_state::TransferState;
pub use transfer_tracker::TransferTracker;
