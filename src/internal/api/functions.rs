pub mod fetch_video_metadata;
pub mod open_download_stream;
