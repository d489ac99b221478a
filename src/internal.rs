pub mod api;
pub mod entrance;
pub mod errors;
pub mod progress;
pub mod states;
pub mod video;
