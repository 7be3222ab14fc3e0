pub mod config;
pub mod logging;

pub mod batch;
pub mod download;
pub mod media;
pub mod retry;
