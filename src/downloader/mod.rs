// Download orchestration over the external yt-dlp tool

pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod utils;

pub use errors::DownloadError;
pub use models::{DownloadMode, DownloadResult};
pub use orchestrator::{Fetcher, YtDlpFetcher};
