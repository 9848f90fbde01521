// Filesystem helpers shared by the orchestrator

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref UNSAFE_CHAR: Regex = Regex::new(r"[^A-Za-z0-9_\-.]").unwrap();
}

/// Replace every character outside `[A-Za-z0-9_.-]` with an underscore.
/// Total and idempotent; one output char per input char.
pub fn sanitize_filename(name: &str) -> String {
    UNSAFE_CHAR.replace_all(name, "_").into_owned()
}

/// Force the expected extension onto a tool-reported path.
pub fn force_extension(path: &Path, ext: &str) -> PathBuf {
    let mut out = path.to_path_buf();
    out.set_extension(ext);
    out
}

/// Rebuild `path` with its base name sanitized; the parent directory
/// is left untouched.
pub fn sanitized_path(path: &Path) -> PathBuf {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => path.with_file_name(sanitize_filename(name)),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_disallowed_chars() {
        assert_eq!(sanitize_filename("a b/c:d.mp3"), "a_b_c_d.mp3");
        assert_eq!(sanitize_filename("Song (live) [HD]!.mp4"), "Song__live___HD__.mp4");
    }

    #[test]
    fn test_sanitize_is_idempotent_and_total() {
        let once = sanitize_filename("ドラえもん: episode 1.mp4");
        assert_eq!(sanitize_filename(&once), once);
        assert_eq!(sanitize_filename(""), "");
    }

    #[test]
    fn test_sanitize_preserves_char_length() {
        let input = "тест видео.mp4";
        let output = sanitize_filename(input);
        assert_eq!(output.chars().count(), input.chars().count());
        assert!(output
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.'));
    }

    #[test]
    fn test_force_extension() {
        assert_eq!(
            force_extension(Path::new("/tmp/title.webm"), "mp3"),
            PathBuf::from("/tmp/title.mp3")
        );
        assert_eq!(
            force_extension(Path::new("/tmp/title.mp4"), "mp4"),
            PathBuf::from("/tmp/title.mp4")
        );
    }

    #[test]
    fn test_sanitized_path_keeps_parent() {
        assert_eq!(
            sanitized_path(Path::new("/tmp/dir/my song.mp3")),
            PathBuf::from("/tmp/dir/my_song.mp3")
        );
    }
}
