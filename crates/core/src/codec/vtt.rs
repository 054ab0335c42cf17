//! WebVTT parsing and generation.
//!
//! VTT differs from SRT in three ways that matter here: a mandatory
//! `WEBVTT` header (optionally followed by free text and a blank line),
//! `.` instead of `,` as the millisecond separator, and an optional cue
//! identifier line preceding the timing line instead of a mandatory
//! numeric index. We reuse the same line state machine shape as the SRT
//! parser and normalize timestamps to the crate-internal `CueTime` so the
//! rest of the pipeline never has to care which format a cue came from.

use tracing::warn;

use super::types::{Cue, CueTime};

#[derive(Debug, PartialEq, Eq)]
enum State {
    Header,
    Identifier,
    Timing,
    Text,
}

/// Parse WebVTT text into cues.
pub fn parse_vtt(text: &str) -> Vec<Cue> {
    let mut cues = Vec::new();

    let mut state = State::Header;
    let mut next_index: usize = 1;
    let mut start = CueTime::from_millis(0);
    let mut end = CueTime::from_millis(0);
    let mut text_lines: Vec<&str> = Vec::new();
    let mut pending_timing_line: Option<&str> = None;

    let finish = |index: usize,
                  start: CueTime,
                  end: CueTime,
                  text_lines: &[&str],
                  cues: &mut Vec<Cue>| {
        if text_lines.is_empty() {
            return;
        }
        cues.push(Cue {
            index,
            start,
            end,
            text: text_lines.join("\n"),
        });
    };

    for raw_line in text.lines() {
        let line = raw_line.trim_end_matches('\r');
        match state {
            State::Header => {
                if line.trim().is_empty() {
                    state = State::Identifier;
                }
                // Everything up to (and including) the blank line after
                // WEBVTT is free-form header text; ignore it.
            }
            State::Identifier => {
                if line.trim().is_empty() {
                    continue;
                }
                if line.contains("-->") {
                    pending_timing_line = Some(line);
                    state = State::Timing;
                } else {
                    // A cue identifier line; the next non-blank line must
                    // be the timing line.
                    state = State::Timing;
                }
            }
            State::Timing => {
                let timing_line = pending_timing_line.take().unwrap_or(line);
                match parse_timing_line(timing_line) {
                    Some((s, e)) => {
                        start = s;
                        end = e;
                        text_lines.clear();
                        state = State::Text;
                    }
                    None => {
                        warn!("skipping VTT cue with malformed timing line: {timing_line:?}");
                        state = State::Identifier;
                    }
                }
            }
            State::Text => {
                if line.trim().is_empty() {
                    finish(next_index, start, end, &text_lines, &mut cues);
                    next_index += 1;
                    text_lines.clear();
                    state = State::Identifier;
                } else {
                    text_lines.push(line);
                }
            }
        }
    }
    if state == State::Text {
        finish(next_index, start, end, &text_lines, &mut cues);
    }

    cues
}

fn parse_timing_line(line: &str) -> Option<(CueTime, CueTime)> {
    let (start_raw, end_raw) = line.split_once("-->")?;
    let start = CueTime::parse(start_raw.trim()).ok()?;
    let end_token = end_raw.trim().split_whitespace().next()?;
    let end = CueTime::parse(end_token).ok()?;
    Some((start, end))
}

/// Render cues as a WebVTT document.
pub fn generate_vtt(cues: &[Cue]) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for (i, cue) in cues.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&cue.start.to_vtt_string());
        out.push_str(" --> ");
        out.push_str(&cue.end.to_vtt_string());
        out.push('\n');
        out.push_str(&cue.text);
        out.push('\n');
    }
    out
}
