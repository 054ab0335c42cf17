//! Unicode bidirectional post-processor.
//!
//! Applied only when the target language is written right-to-left and a
//! given line actually contains RTL characters. LLMs routinely emit RTL
//! translations with embedded Latin numerals, punctuation, and quoted
//! spans that render in the wrong visual order inside naive subtitle
//! renderers; this module injects the Unicode formatting marks that fix
//! that without touching the underlying character data.

use once_cell::sync::Lazy;
use regex::Regex;

const LRM: char = '\u{200E}';
const RLM: char = '\u{200F}';
const RLE: char = '\u{202B}';
const PDF: char = '\u{202C}';

static NUMERIC_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[$€£¥₪]?[+-]?\d+([,.]\d+)*(:\d+)?%?").unwrap()
});

static TRAILING_PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?,:;]+$").unwrap());

static BRACKET_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([(\["'])([^()\[\]"']*)([)\]"'])"#).unwrap()
});

/// Languages whose script is written right-to-left, matched by either ISO
/// code or common English name (settings may carry either).
const RTL_LANGUAGES: &[&str] = &[
    "he", "heb", "hebrew", "ar", "ara", "arabic", "fa", "per", "fas", "persian", "farsi", "ur",
    "urd", "urdu", "ps", "pus", "pashto",
];

/// Whether `lang` (an ISO code or English name, case-insensitive) names a
/// right-to-left script.
pub fn is_rtl_language(lang: &str) -> bool {
    let lower = lang.trim().to_lowercase();
    RTL_LANGUAGES.contains(&lower.as_str())
}

/// Whether `text` contains at least one codepoint from the Hebrew, Arabic,
/// Syriac, or Arabic Extended-A blocks.
pub fn contains_rtl_chars(text: &str) -> bool {
    text.chars().any(is_rtl_char)
}

fn is_rtl_char(c: char) -> bool {
    let cp = c as u32;
    (0x0590..=0x05FF).contains(&cp)
        || (0x0600..=0x06FF).contains(&cp)
        || (0x0750..=0x077F).contains(&cp)
        || (0x08A0..=0x08FF).contains(&cp)
}

/// Apply bidi post-processing to `text` if `target_lang` is RTL and the
/// text contains RTL characters; otherwise return it unchanged. Processes
/// line-by-line so each displayed subtitle line gets its own embedding.
pub fn process(text: &str, target_lang: &str) -> String {
    if !is_rtl_language(target_lang) {
        return text.to_string();
    }
    text.lines()
        .map(process_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn process_line(line: &str) -> String {
    if line.is_empty() || !contains_rtl_chars(line) {
        return line.to_string();
    }

    let mut out = line.to_string();

    // 1. Wrap numeric runs in LRM...LRM so they display left-to-right.
    out = NUMERIC_RUN
        .replace_all(&out, |caps: &regex::Captures| {
            format!("{LRM}{}{LRM}", &caps[0])
        })
        .into_owned();

    // 2. Insert RLM before trailing terminal punctuation.
    if let Some(m) = TRAILING_PUNCTUATION.find(&out) {
        let (head, tail) = out.split_at(m.start());
        out = format!("{head}{RLM}{tail}");
    }

    // 3. Bracketed/quoted spans: LRM-wrap LTR inner content, RLM-surround
    // RTL inner content.
    out = BRACKET_SPAN
        .replace_all(&out, |caps: &regex::Captures| {
            let open = &caps[1];
            let inner = &caps[2];
            let close = &caps[3];
            if inner.is_empty() {
                return format!("{open}{inner}{close}");
            }
            if contains_rtl_chars(inner) {
                format!("{RLM}{open}{inner}{close}{RLM}")
            } else {
                format!("{open}{LRM}{inner}{LRM}{close}")
            }
        })
        .into_owned();

    // 4. Embed the whole line to pin the base direction.
    format!("{RLE}{RLM}{out}{PDF}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_rtl_target_is_a_no_op() {
        let text = "Bonjour";
        assert_eq!(process(text, "fr"), text);
    }

    #[test]
    fn rtl_target_without_rtl_chars_is_a_no_op() {
        let text = "Hello";
        assert_eq!(process(text, "he"), text);
    }

    #[test]
    fn hebrew_line_gets_embedded() {
        let processed = process("שלום", "Hebrew");
        assert!(processed.starts_with(RLE));
        assert!(processed.contains(RLM));
        assert!(processed.ends_with(PDF));
        assert!(processed.contains("שלום"));
    }

    #[test]
    fn numeric_runs_are_lrm_wrapped() {
        let processed = process("מחיר 100 שקל", "he");
        let wrapped = format!("{LRM}100{LRM}");
        assert!(processed.contains(&wrapped));
    }

    #[test]
    fn detects_rtl_language_aliases() {
        assert!(is_rtl_language("Hebrew"));
        assert!(is_rtl_language("ar"));
        assert!(is_rtl_language("urdu"));
        assert!(!is_rtl_language("en"));
        assert!(!is_rtl_language("spanish"));
    }
}
