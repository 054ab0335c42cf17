//! SRT parsing and generation.
//!
//! Parsing is a small line state machine rather than a single greedy regex.
//! A regex-based "read until the next blank line" approach is tempting but
//! wrong: it's easy to accidentally stop at the *first* embedded newline
//! inside a multi-line cue instead of the blank line that actually
//! terminates it. We walk line-by-line and only end a cue's `Text` state on
//! a genuinely blank line (or EOF), so multi-line cues survive intact.

use tracing::warn;

use super::error::CodecError;
use super::types::{Cue, CueTime};

#[derive(Debug, PartialEq, Eq)]
enum State {
    Index,
    Timing,
    Text,
}

/// Parse SRT text into cues. Malformed entries are skipped with a warning
/// rather than aborting the whole document.
pub fn parse_srt(text: &str) -> Vec<Cue> {
    let mut cues = Vec::new();

    let mut state = State::Index;
    let mut index: usize = 0;
    let mut start = CueTime::from_millis(0);
    let mut end = CueTime::from_millis(0);
    let mut text_lines: Vec<&str> = Vec::new();

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
            State::Index => {
                if line.trim().is_empty() {
                    continue;
                }
                match line.trim().parse::<usize>() {
                    Ok(n) => {
                        index = n;
                        state = State::Timing;
                    }
                    Err(_) => {
                        warn!("skipping SRT block with malformed index: {line:?}");
                        // stay in Index state, hope the next line recovers
                    }
                }
            }
            State::Timing => match parse_timing_line(line) {
                Some((s, e)) => {
                    start = s;
                    end = e;
                    text_lines.clear();
                    state = State::Text;
                }
                None => {
                    warn!("skipping SRT block with malformed timing line: {line:?}");
                    state = State::Index;
                }
            },
            State::Text => {
                if line.trim().is_empty() {
                    finish(index, start, end, &text_lines, &mut cues);
                    text_lines.clear();
                    state = State::Index;
                } else {
                    text_lines.push(line);
                }
            }
        }
    }
    // EOF while still accumulating text (no trailing blank line).
    if state == State::Text {
        finish(index, start, end, &text_lines, &mut cues);
    }

    cues
}

fn parse_timing_line(line: &str) -> Option<(CueTime, CueTime)> {
    let (start_raw, end_raw) = line.split_once("-->")?;
    let start = CueTime::parse(start_raw.trim()).ok()?;
    // The end field may carry trailing positioning directives (X1:.. etc);
    // only the leading timestamp token matters.
    let end_token = end_raw.trim().split_whitespace().next()?;
    let end = CueTime::parse(end_token).ok()?;
    Some((start, end))
}

/// Render cues as SRT text: one blank line between cues, none after the last.
pub fn generate_srt(cues: &[Cue]) -> String {
    let mut out = String::new();
    for (i, cue) in cues.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&(i + 1).to_string());
        out.push('\n');
        out.push_str(&cue.start.to_srt_string());
        out.push_str(" --> ");
        out.push_str(&cue.end.to_srt_string());
        out.push('\n');
        out.push_str(&cue.text);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_simple_cues() {
        let input =
            "1\n00:00:01,000 --> 00:00:03,500\nHello\n\n2\n00:00:04,000 --> 00:00:05,000\nWorld\n";
        let cues = parse_srt(input);
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].index, 1);
        assert_eq!(cues[0].start.as_millis(), 1000);
        assert_eq!(cues[0].end.as_millis(), 3500);
        assert_eq!(cues[0].text, "Hello");
        assert_eq!(cues[1].text, "World");
    }

    #[test]
    fn preserves_multiline_cue_text() {
        // The historical bug this guards against: truncating at the first
        // embedded newline instead of the blank-line terminator.
        let input = "3\n00:00:10,000 --> 00:00:12,000\nline1\nline2\n\n";
        let cues = parse_srt(input);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "line1\nline2");
    }

    #[test]
    fn handles_missing_trailing_blank_line() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\nonly cue";
        let cues = parse_srt(input);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "only cue");
    }

    #[test]
    fn skips_malformed_blocks_but_keeps_going() {
        let input = "oops\nnot-a-timing-line\n\n1\n00:00:01,000 --> 00:00:02,000\nGood\n\n";
        let cues = parse_srt(input);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "Good");
    }

    #[test]
    fn round_trip_generates_canonical_srt() {
        let input = "1\n00:00:01,000 --> 00:00:03,500\nHello\n\n2\n00:00:04,000 --> 00:00:05,000\nWorld\n";
        let cues = parse_srt(input);
        let generated = generate_srt(&cues);
        assert_eq!(generated, input);
    }
}
