use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::CodecError;

/// A timestamp, stored internally as milliseconds since the start of the
/// document. Cheap to copy and compare; all arithmetic stays in integer
/// milliseconds to avoid floating-point drift across parse/generate cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CueTime(pub u64);

impl CueTime {
    pub fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Parse `HH:MM:SS,mmm` or `HH:MM:SS.mmm` (VTT uses the latter).
    pub fn parse(raw: &str) -> Result<Self, CodecError> {
        let raw = raw.trim();
        let (main, millis) = raw
            .split_once(',')
            .or_else(|| raw.split_once('.'))
            .ok_or_else(|| CodecError::BadTimestamp(raw.to_string()))?;

        let mut parts = main.split(':');
        let h: u64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| CodecError::BadTimestamp(raw.to_string()))?;
        let m: u64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| CodecError::BadTimestamp(raw.to_string()))?;
        let s: u64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| CodecError::BadTimestamp(raw.to_string()))?;
        if parts.next().is_some() {
            return Err(CodecError::BadTimestamp(raw.to_string()));
        }

        let millis = match millis.len() {
            3 => millis
                .parse::<u64>()
                .map_err(|_| CodecError::BadTimestamp(raw.to_string()))?,
            len if len < 3 => {
                let padded = format!("{:0<3}", millis);
                padded
                    .parse::<u64>()
                    .map_err(|_| CodecError::BadTimestamp(raw.to_string()))?
            }
            _ => millis[..3]
                .parse::<u64>()
                .map_err(|_| CodecError::BadTimestamp(raw.to_string()))?,
        };

        Ok(Self(((h * 3600 + m * 60 + s) * 1000) + millis))
    }

    /// Render in SRT form (`,` separator).
    pub fn to_srt_string(&self) -> String {
        self.render(',')
    }

    /// Render in VTT form (`.` separator).
    pub fn to_vtt_string(&self) -> String {
        self.render('.')
    }

    fn render(&self, sep: char) -> String {
        let total_ms = self.0;
        let ms = total_ms % 1000;
        let total_secs = total_ms / 1000;
        let s = total_secs % 60;
        let total_mins = total_secs / 60;
        let m = total_mins % 60;
        let h = total_mins / 60;
        format!("{:02}:{:02}:{:02}{}{:03}", h, m, s, sep, ms)
    }
}

impl fmt::Display for CueTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_srt_string())
    }
}

/// One timed subtitle entry. `index` is carried through for display purposes
/// only -- cue identity for every other purpose in this crate is positional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    pub index: usize,
    pub start: CueTime,
    pub end: CueTime,
    /// Newline-significant; a cue may render on 1..N visible lines.
    pub text: String,
}

impl Cue {
    pub fn line_count(&self) -> usize {
        if self.text.is_empty() {
            0
        } else {
            self.text.lines().count()
        }
    }
}

/// The on-the-wire subtitle container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubtitleFormat {
    Srt,
    Vtt,
}

impl SubtitleFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "application/x-subrip; charset=utf-8",
            SubtitleFormat::Vtt => "text/vtt; charset=utf-8",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::Vtt => "vtt",
        }
    }
}

/// A parsed subtitle document: an ordered cue list plus its source format tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleDocument {
    pub format: SubtitleFormat,
    pub cues: Vec<Cue>,
}
