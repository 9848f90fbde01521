// Dialog state machine: callback actions and transitions

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::downloader::DownloadMode;

use super::session::Stage;

/// Callback identifiers on the inline keyboards.
pub const CB_AUDIO: &str = "choose_audio";
pub const CB_VIDEO: &str = "choose_video";
pub const CB_VIDEO_360: &str = "video_360";
pub const CB_VIDEO_480: &str = "video_480";
pub const CB_VIDEO_1080: &str = "video_1080";
pub const CB_CANCEL: &str = "choose_cancel";

/// A recognized button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ChooseAudio,
    ChooseVideo,
    Resolution(DownloadMode),
    Cancel,
}

impl Action {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            CB_AUDIO => Some(Self::ChooseAudio),
            CB_VIDEO => Some(Self::ChooseVideo),
            CB_VIDEO_360 => Some(Self::Resolution(DownloadMode::Video360)),
            CB_VIDEO_480 => Some(Self::Resolution(DownloadMode::Video480)),
            CB_VIDEO_1080 => Some(Self::Resolution(DownloadMode::Video1080)),
            CB_CANCEL => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// What the controller must do next for a button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Kick off the batch in the given mode and remove the session.
    StartBatch(DownloadMode),
    /// Move the session to AwaitingQuality and show resolutions.
    AskQuality,
    /// Remove the session without downloading anything.
    Cancel,
    /// Choice not valid for the current stage; leave the session alone.
    Rejected,
}

/// Advance the dialog. `stage` is None when the user has no session
/// (a stale button press); Cancel is honored in any state.
pub fn advance(stage: Option<Stage>, action: Action) -> Step {
    match (stage, action) {
        (_, Action::Cancel) => Step::Cancel,
        (Some(Stage::AwaitingFormat), Action::ChooseAudio) => Step::StartBatch(DownloadMode::Audio),
        (Some(Stage::AwaitingFormat), Action::ChooseVideo) => Step::AskQuality,
        (Some(Stage::AwaitingQuality), Action::Resolution(mode)) => Step::StartBatch(mode),
        _ => Step::Rejected,
    }
}

/// Keyboard for the first step: Audio / Video, plus Cancel.
pub fn format_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        vec![
            InlineKeyboardButton::callback("🎵 Audio", CB_AUDIO),
            InlineKeyboardButton::callback("📺 Video", CB_VIDEO),
        ],
        vec![InlineKeyboardButton::callback("❌ Cancel", CB_CANCEL)],
    ])
}

/// Keyboard for the second step: the three resolutions, plus Cancel.
pub fn quality_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        vec![
            InlineKeyboardButton::callback("📺 360p", CB_VIDEO_360),
            InlineKeyboardButton::callback("📺 480p", CB_VIDEO_480),
            InlineKeyboardButton::callback("📺 1080p", CB_VIDEO_1080),
        ],
        vec![InlineKeyboardButton::callback("❌ Cancel", CB_CANCEL)],
    ])
}
