// YouTube link extraction from free text

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Watch, Shorts and short-link forms. Scheme and host match
    // case-insensitively; query/id characters are taken as-is.
    static ref YOUTUBE_LINK: Regex = Regex::new(
        r"(?i)https?://(?:www\.)?(?:youtube\.com/(?:watch\?v=|shorts/)|youtu\.be/)[\w\-?&=]+"
    )
    .unwrap();
}

/// Return every YouTube link in `text`, in order of appearance.
/// Duplicates are kept; text without links yields an empty vec.
pub fn extract_youtube_links(text: &str) -> Vec<String> {
    YOUTUBE_LINK
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Run extraction over every line of a text blob (a `.txt` attachment),
/// concatenating results in file order.
pub fn extract_links_from_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .flat_map(|line| extract_youtube_links(line.trim()))
        .collect()
}
