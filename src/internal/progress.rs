//! 进度估算领域模块：把原始字节进度折算成平滑、单调不减的百分比。
//!
//! - [`structs::ProgressEstimator`]：纯状态机，`(状态, 事件) -> (新状态, 定时器副作用)`；
//! - [`structs::TransferTracker`]：运行时驱动，用 tokio 定时器执行副作用并发布状态。
//!
//! 对外导出以 [`crate::progress`] 为准。

pub mod structs;
