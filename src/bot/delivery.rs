// Per-link download-and-send loop

use std::path::Path;

use teloxide::prelude::*;
use teloxide::types::InputFile;
use tokio::fs;
use tracing::{info, warn};

use crate::downloader::{DownloadMode, DownloadResult, Fetcher};

/// Upload ceiling: 4 GiB.
pub const MAX_FILE_SIZE: u64 = 4 * 1024 * 1024 * 1024;

/// Why a produced file was rejected before upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    TooLarge,
}

impl Rejection {
    fn message(self) -> &'static str {
        match self {
            Self::Empty => "❌ File is empty. Download failed!",
            Self::TooLarge => "❌ File too large! Max 4GB allowed.",
        }
    }
}

/// Size gate applied to every produced file before upload.
pub fn size_gate(size: u64) -> Result<(), Rejection> {
    if size == 0 {
        Err(Rejection::Empty)
    } else if size > MAX_FILE_SIZE {
        Err(Rejection::TooLarge)
    } else {
        Ok(())
    }
}

/// Process every link of a batch sequentially under one mode. One
/// link's failure never aborts the rest: each error is reported to the
/// chat and the loop moves on.
pub async fn process_batch(
    bot: &Bot,
    chat: ChatId,
    fetcher: &dyn Fetcher,
    links: &[String],
    mode: DownloadMode,
    cookies: Option<&Path>,
) {
    for link in links {
        if let Err(e) = process_link(bot, chat, fetcher, link, mode, cookies).await {
            warn!(link = %link, error = %e, "link failed");
            let _ = bot
                .send_message(chat, format!("❌ Failed for {link}:\n{e}"))
                .await;
        }
    }
}

async fn process_link(
    bot: &Bot,
    chat: ChatId,
    fetcher: &dyn Fetcher,
    link: &str,
    mode: DownloadMode,
    cookies: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let announce = bot.send_message(chat, format!("🎯 Processing: {link}")).await?;

    let DownloadResult { path, size } = fetcher.fetch(link, mode, cookies).await?;

    if let Err(rejection) = size_gate(size) {
        let _ = fs::remove_file(&path).await;
        bot.send_message(chat, rejection.message()).await?;
        return Ok(());
    }

    info!(link, path = %path.display(), size, "uploading");
    let upload = bot.send_document(chat, InputFile::file(path.clone())).await;

    // The local artifact goes away whether or not the upload worked.
    let _ = fs::remove_file(&path).await;
    upload?;

    let _ = bot.delete_message(chat, announce.id).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_gate_accepts_normal_files() {
        assert_eq!(size_gate(1), Ok(()));
        assert_eq!(size_gate(MAX_FILE_SIZE), Ok(()));
    }

    #[test]
    fn test_size_gate_rejects_empty() {
        assert_eq!(size_gate(0), Err(Rejection::Empty));
    }

    #[test]
    fn test_size_gate_rejects_oversized() {
        // 5 GiB
        assert_eq!(size_gate(5 * 1024 * 1024 * 1024), Err(Rejection::TooLarge));
        assert_eq!(size_gate(MAX_FILE_SIZE + 1), Err(Rejection::TooLarge));
    }
}
