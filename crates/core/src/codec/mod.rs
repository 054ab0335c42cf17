//! Subtitle codec: parses SRT and VTT into an ordered cue list and
//! regenerates either format from it. This is the leaf dependency for
//! everything else in the crate -- no other module parses subtitle text
//! directly.

mod error;
mod srt;
mod types;
mod vtt;

pub use error::CodecError;
pub use srt::{generate_srt, parse_srt};
pub use types::{Cue, CueTime, SubtitleDocument, SubtitleFormat};
pub use vtt::{generate_vtt, parse_vtt};

/// Strip a leading UTF-8 BOM and normalize all line endings to LF.
fn normalize(text: &str) -> String {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Detect format and parse. VTT if the first non-BOM, non-whitespace token
/// is the literal `WEBVTT`; SRT otherwise.
pub fn parse(text: &str) -> Result<SubtitleDocument, CodecError> {
    let normalized = normalize(text);
    let format = if normalized.trim_start().starts_with("WEBVTT") {
        SubtitleFormat::Vtt
    } else {
        SubtitleFormat::Srt
    };

    let cues = match format {
        SubtitleFormat::Srt => parse_srt(&normalized),
        SubtitleFormat::Vtt => parse_vtt(&normalized),
    };

    if cues.is_empty() {
        return Err(CodecError::Empty);
    }

    Ok(SubtitleDocument { format, cues })
}

/// Generate text in the given format from a cue list, regardless of the
/// format the cues originated from.
pub fn generate(cues: &[Cue], format: SubtitleFormat) -> String {
    match format {
        SubtitleFormat::Srt => generate_srt(cues),
        SubtitleFormat::Vtt => generate_vtt(cues),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_srt_by_default() {
        let doc = parse("1\n00:00:01,000 --> 00:00:02,000\nHi\n\n").unwrap();
        assert_eq!(doc.format, SubtitleFormat::Srt);
    }

    #[test]
    fn detects_vtt_by_header() {
        let doc = parse("WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHi\n\n").unwrap();
        assert_eq!(doc.format, SubtitleFormat::Vtt);
    }

    #[test]
    fn strips_bom_before_detection() {
        let doc = parse("\u{FEFF}WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHi\n\n").unwrap();
        assert_eq!(doc.format, SubtitleFormat::Vtt);
    }

    #[test]
    fn empty_document_is_reported_non_fatally() {
        let result = parse("garbage with no cues at all");
        assert!(matches!(result, Err(CodecError::Empty)));
    }

    #[test]
    fn format_conversion_round_trips() {
        let doc = parse("1\n00:00:01,000 --> 00:00:02,000\nHi\n\n").unwrap();
        let vtt_text = generate(&doc.cues, SubtitleFormat::Vtt);
        let reparsed = parse(&vtt_text).unwrap();
        assert_eq!(reparsed.cues[0].text, doc.cues[0].text);
        assert_eq!(reparsed.cues[0].start, doc.cues[0].start);
    }
}
