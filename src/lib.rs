pub mod bot;
pub mod config;
pub mod downloader;
pub mod extract;
