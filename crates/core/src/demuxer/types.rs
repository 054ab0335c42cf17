use serde::Serialize;

/// A single subtitle track as reported by `ffprobe -show_streams`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleTrack {
    /// ffprobe stream index, not the subtitle-only ordinal.
    pub index: usize,
    pub language: Option<String>,
    pub codec: String,
    pub title: Option<String>,
}

impl SubtitleTrack {
    /// True if this track's language tag matches the English forms the
    /// batch orchestrator looks for (`en`, `eng`, `english`).
    pub fn is_english(&self) -> bool {
        self.language
            .as_deref()
            .map(|lang| {
                let lower = lang.to_lowercase();
                lower == "en" || lower == "eng" || lower == "english"
            })
            .unwrap_or(false)
    }
}
