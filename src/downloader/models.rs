// Download modes and results

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Target MP3 bitrate for audio extraction.
const AUDIO_BITRATE: &str = "192K";

/// The user's combined format+quality choice. Fully determines the
/// options passed to yt-dlp, the forced output extension and the
/// user-facing label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DownloadMode {
    Audio,
    Video360,
    Video480,
    Video1080,
}

impl DownloadMode {
    /// Video height cap in pixels; None for audio.
    pub fn height_cap(self) -> Option<u32> {
        match self {
            Self::Audio => None,
            Self::Video360 => Some(360),
            Self::Video480 => Some(480),
            Self::Video1080 => Some(1080),
        }
    }

    /// Extension forced onto the produced file.
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Audio => "mp3",
            _ => "mp4",
        }
    }

    /// Short label used in progress messages ("audio", "360p", ...).
    pub fn label(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video360 => "360p",
            Self::Video480 => "480p",
            Self::Video1080 => "1080p",
        }
    }

    /// Mode-specific yt-dlp arguments. Audio extracts the best audio
    /// stream and transcodes to MP3; video takes the best video+audio
    /// pair under the height cap, falling back to the best combined
    /// stream under that cap, merged into MP4.
    pub fn ytdlp_args(self) -> Vec<String> {
        match self.height_cap() {
            None => vec![
                "--format".into(),
                "bestaudio/best".into(),
                "--extract-audio".into(),
                "--audio-format".into(),
                "mp3".into(),
                "--audio-quality".into(),
                AUDIO_BITRATE.into(),
            ],
            Some(h) => vec![
                "--format".into(),
                format!("bestvideo[height<={h}]+bestaudio/best[height<={h}]/best[height<={h}]"),
                "--merge-output-format".into(),
                "mp4".into(),
            ],
        }
    }
}

/// A finished download. The caller owns the file and must delete it
/// after transfer, on success and failure alike.
#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub path: PathBuf,
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_caps() {
        assert_eq!(DownloadMode::Audio.height_cap(), None);
        assert_eq!(DownloadMode::Video360.height_cap(), Some(360));
        assert_eq!(DownloadMode::Video480.height_cap(), Some(480));
        assert_eq!(DownloadMode::Video1080.height_cap(), Some(1080));
    }

    #[test]
    fn test_audio_args_request_mp3_transcode() {
        let args = DownloadMode::Audio.ytdlp_args();
        assert!(args.contains(&"--extract-audio".to_string()));
        let pos = args.iter().position(|a| a == "--audio-format").unwrap();
        assert_eq!(args[pos + 1], "mp3");
        assert_eq!(DownloadMode::Audio.file_extension(), "mp3");
    }

    #[test]
    fn test_video_args_cap_height_with_fallback() {
        let args = DownloadMode::Video480.ytdlp_args();
        let pos = args.iter().position(|a| a == "--format").unwrap();
        assert_eq!(
            args[pos + 1],
            "bestvideo[height<=480]+bestaudio/best[height<=480]/best[height<=480]"
        );
        assert!(args.contains(&"--merge-output-format".to_string()));
        assert_eq!(DownloadMode::Video480.file_extension(), "mp4");
    }
}
