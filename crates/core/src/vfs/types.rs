use serde::Serialize;

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "ts", "mpg", "mpeg",
];
const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "vtt"];

/// A single entry returned by `Vfs::list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VfsEntry {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub is_video: bool,
    pub is_subtitle: bool,
    /// Whether a sibling subtitle file with the same stem exists.
    pub has_subtitle: bool,
    /// Language tag of a detected sibling subtitle, if any (e.g.
    /// `"en"` from `movie.en.srt`).
    pub language: Option<String>,
}

/// True if `name`'s extension matches a known video container.
pub fn is_video_file(name: &str) -> bool {
    extension_of(name)
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// True if `name`'s extension is a subtitle format this crate handles.
pub fn is_subtitle_file(name: &str) -> bool {
    extension_of(name)
        .map(|ext| SUBTITLE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn extension_of(name: &str) -> Option<String> {
    name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())
}

/// Parses the `{basename}.{lang}.srt` / `.vtt` sibling naming convention
/// used by `Vfs::write_subtitle`, returning `lang` if `name` matches it.
pub fn sibling_language_tag(video_stem: &str, subtitle_name: &str) -> Option<String> {
    let lower_stem = video_stem.to_lowercase();
    let lower_name = subtitle_name.to_lowercase();
    if !lower_name.starts_with(&lower_stem) {
        return None;
    }
    let rest = &subtitle_name[video_stem.len()..];
    let rest = rest.strip_prefix('.')?;
    let (lang, ext) = rest.rsplit_once('.')?;
    if SUBTITLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()) && !lang.is_empty() {
        Some(lang.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_video_extensions_case_insensitively() {
        assert!(is_video_file("Movie.MKV"));
        assert!(is_video_file("clip.mp4"));
        assert!(!is_video_file("notes.txt"));
    }

    #[test]
    fn detects_subtitle_extensions() {
        assert!(is_subtitle_file("movie.srt"));
        assert!(is_subtitle_file("movie.VTT"));
        assert!(!is_subtitle_file("movie.mkv"));
    }

    #[test]
    fn sibling_language_tag_extracts_lang_code() {
        assert_eq!(
            sibling_language_tag("movie", "movie.fr.srt"),
            Some("fr".to_string())
        );
        assert_eq!(sibling_language_tag("movie", "movie.srt"), None);
        assert_eq!(sibling_language_tag("movie", "other.fr.srt"), None);
    }
}
