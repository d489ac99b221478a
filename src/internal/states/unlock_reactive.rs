//! # UnlockReactiveProperty
//!
//! 轻量级响应式属性容器，读写不阻塞，适合高频更新的进度状态。
//!
//! ## 使用示例
//! ```rust,no_run
//! use video_grab::states::unlock_reactive::UnlockReactiveProperty;
//!
//! let prop = UnlockReactiveProperty::new(0.0f64);
//! prop.update(1.0);
//! prop.update_field(|v| *v += 0.5);
//! ```

pub use super::reactive_core::{PropertyWatcher, ReactivePropertyError as UnlockReactivePropertyError};

/// 轻量级响应式属性容器。
pub type UnlockReactiveProperty<T> = super::reactive_core::ReactiveProperty<T>;
