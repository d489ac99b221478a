//! 远程视频服务的访问层：客户端、配置、格式选择与两个接口调用。

pub mod enums;
pub mod functions;
pub mod structs;
