// Error types for the download orchestrator

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// The yt-dlp binary could not be launched at all.
    #[error("failed to launch {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// yt-dlp exited non-zero; carries the tool's own message.
    #[error("yt-dlp failed: {0}")]
    Extraction(String),

    /// yt-dlp succeeded but printed no output file path.
    #[error("yt-dlp did not report an output file")]
    NoReportedPath,

    /// Renaming to the sanitized file name failed.
    #[error("failed to rename {} to {}: {source}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The produced file is absent after a reported success.
    #[error("downloaded file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),
}
