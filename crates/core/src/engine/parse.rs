//! Response-marker extraction and cleanup for LLM translation replies.
//!
//! The `regex` crate has no lookahead, so `<<~(\d+)~>> text` pairs can't
//! be extracted with a single `(?=<<~\d+~>>|$)`-style pattern. Instead
//! this finds every marker's match span with `find_iter`, then slices
//! the text between consecutive marker starts procedurally -- the same
//! spirit as the codec module replacing a fragile regex with an explicit
//! state machine.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"<<~(\d+)~>>").unwrap());

static PREAMBLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)^translation:\s*").unwrap(),
        Regex::new(r"(?i)^here(?:'s| is) (?:the )?translation:\s*").unwrap(),
        Regex::new(r"(?i)^in [a-z]+:\s*").unwrap(),
        Regex::new(r"^```[a-zA-Z]*\s*").unwrap(),
        Regex::new(r"\s*```$").unwrap(),
    ]
});

/// Extract `(index, translation)` pairs from a raw LLM reply. Missing
/// indices are simply absent from the returned map -- the caller falls
/// back to the original cue text for those.
pub fn parse_markers(text: &str) -> HashMap<usize, String> {
    let captures: Vec<_> = MARKER.captures_iter(text).collect();
    let starts: Vec<usize> = MARKER.find_iter(text).map(|m| m.start()).collect();
    let ends: Vec<usize> = MARKER.find_iter(text).map(|m| m.end()).collect();
    let mut out = HashMap::new();

    for (pos, cap) in captures.iter().enumerate() {
        let index: usize = match cap[1].parse() {
            Ok(i) => i,
            Err(_) => continue,
        };
        let start = ends[pos];
        let end = starts.get(pos + 1).copied().unwrap_or(text.len());
        let raw = text[start..end].trim();
        out.insert(index, clean_translation(raw));
    }

    out
}

/// Strip chatty preambles, code-fence markers, outer matching quotes,
/// and stray `[[[`/`]]]` wrappers some models add; convert the `||`
/// line-break marker back into a real newline.
pub fn clean_translation(raw: &str) -> String {
    let mut text = raw.trim().to_string();

    for pattern in PREAMBLE_PATTERNS.iter() {
        text = pattern.replace(&text, "").into_owned();
    }

    let trimmed = text.trim();
    text = trimmed
        .strip_prefix("[[[")
        .and_then(|s| s.strip_suffix("]]]"))
        .unwrap_or(trimmed)
        .to_string();

    let trimmed = text.trim();
    if trimmed.len() >= 2 {
        let stripped = match (trimmed.chars().next(), trimmed.chars().last()) {
            (Some('"'), Some('"')) => Some(&trimmed[1..trimmed.len() - 1]),
            (Some('\''), Some('\'')) => Some(&trimmed[1..trimmed.len() - 1]),
            _ => None,
        };
        if let Some(s) = stripped {
            text = s.to_string();
        }
    }

    text.split("||")
        .map(|segment| segment.trim())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiple_markers() {
        let reply = "<<~0~>> Hello\n<<~1~>> Hi\n";
        let parsed = parse_markers(reply);
        assert_eq!(parsed.get(&0).map(String::as_str), Some("Hello"));
        assert_eq!(parsed.get(&1).map(String::as_str), Some("Hi"));
    }

    #[test]
    fn parses_markers_out_of_order() {
        let reply = "<<~1~>> second\n<<~0~>> first\n";
        let parsed = parse_markers(reply);
        assert_eq!(parsed.get(&0).map(String::as_str), Some("first"));
        assert_eq!(parsed.get(&1).map(String::as_str), Some("second"));
    }

    #[test]
    fn missing_index_is_simply_absent() {
        let reply = "<<~0~>> Hello\n";
        let parsed = parse_markers(reply);
        assert!(!parsed.contains_key(&1));
    }

    #[test]
    fn strips_chatty_preamble() {
        assert_eq!(clean_translation("Translation: Bonjour"), "Bonjour");
        assert_eq!(
            clean_translation("Here's the translation: Bonjour"),
            "Bonjour"
        );
    }

    #[test]
    fn strips_code_fence_and_quotes() {
        assert_eq!(clean_translation("```\nBonjour\n```"), "Bonjour");
        assert_eq!(clean_translation("\"Bonjour\""), "Bonjour");
    }

    #[test]
    fn strips_stray_bracket_wrapper() {
        assert_eq!(clean_translation("[[[Bonjour]]]"), "Bonjour");
    }

    #[test]
    fn converts_marker_back_to_newline() {
        assert_eq!(clean_translation("line1 || line2"), "line1\nline2");
    }
}
