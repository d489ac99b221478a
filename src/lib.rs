/// 内部实现的模块
mod internal;


/// 导出核心入口函数
pub use internal::entrance::remote::*;

pub mod errors {
    pub use crate::internal::errors::*;
}

/// 远程视频服务访问能力：客户端、配置、下载格式
pub mod api {
    use crate::internal;
    pub use internal::api::enums::{ApiEndpoint, FormatSelector};
    pub use internal::api::structs::api_client::ApiClient;
    pub use internal::api::structs::client_config::*;
}

/// 进度估算：纯状态机与运行时追踪器
pub mod progress {
    use crate::internal;
    pub use internal::progress::structs::*;
    pub use internal::progress::structs::estimator_config::{
        DEFAULT_ACCEPT_THRESHOLD, DEFAULT_COMPLETE_HOLD_MS, DEFAULT_FINALIZE_HOLD_MS,
        DEFAULT_KNOWN_TOTAL_CAP, DEFAULT_NUDGE_CEILING, DEFAULT_NUDGE_STEP,
        DEFAULT_STARTING_BUMP_DELAY_MS, DEFAULT_STARTING_TICK_CAP,
        DEFAULT_STARTING_TICK_INTERVAL_MS, DEFAULT_UNKNOWN_TOTAL_CAP,
    };
}

pub mod states {
    pub mod unlock_reactive {
        use crate::internal;
        pub use internal::states::unlock_reactive::*;
    }
}

pub mod video {
    use crate::internal;
    // 结构体模型
    pub use internal::video::structs::video::*;
    pub use internal::video::structs::video_metadata::*;
    // 下载器：类型与入口
    pub use internal::video::downloader::structs::*;
    pub use internal::video::downloader::traits::*;
}
