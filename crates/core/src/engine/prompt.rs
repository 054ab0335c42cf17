//! System/user prompt construction for the translation engine.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::codec::Cue;

/// A cue's every non-empty line matching this pattern is assumed to be a
/// hearing-impaired cue (e.g. `[door slams]`, `(laughs)`) and, when the
/// setting is enabled, is skipped entirely rather than sent to the LLM.
static HEARING_IMPAIRED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[\[\(][^\]\)]+[\]\)]\s*$").unwrap());

/// Whether every non-empty line of `text` looks like a hearing-impaired
/// annotation.
pub fn is_hearing_impaired(text: &str) -> bool {
    let mut saw_any = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        saw_any = true;
        if !HEARING_IMPAIRED_LINE.is_match(line) {
            return false;
        }
    }
    saw_any
}

/// System prompt instructing the model to translate only, preserve
/// inline markup, keep `||` as the line-break marker, and obey the
/// `<<~i~>>` delimiter protocol.
pub fn system_prompt(target_lang: &str, is_rtl: bool) -> String {
    let mut prompt = format!(
        "You are a subtitle translator. Translate the numbered subtitle \
         lines into {target_lang}. Translate only -- do not add \
         commentary, explanations, or a preamble. Preserve any \
         HTML-like inline tags (e.g. <i>, <b>) exactly as given. The \
         token `||` marks a line break inside a cue; keep it in your \
         output at the same relative position. Respond using the exact \
         same `<<~i~>>` markers as the input, one per line, with nothing \
         before the first marker or after the last translation."
    );
    if is_rtl {
        prompt.push_str(
            " The target language is written right-to-left; translate \
             naturally in its own script without adding directional \
             marks yourself.",
        );
    }
    prompt
}

/// User prompt listing cues as `<<~i~>> flattened-text`, internal
/// newlines replaced by the `||` marker so a single line of input maps
/// to a single line of output per cue.
pub fn user_prompt(cues: &[&Cue]) -> String {
    let mut out = String::new();
    for (i, cue) in cues.iter().enumerate() {
        let flattened = cue.text.replace('\n', " || ");
        out.push_str(&format!("<<~{i}~>> {flattened}\n"));
    }
    out
}
