pub mod video;
pub mod video_metadata;
