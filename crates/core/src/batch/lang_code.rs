//! Maps a settings `targetLanguage` value (an English name or an ISO
//! code -- the catalog and the engine both accept either) to the short
//! code used in the `{basename}.{lang}.srt` sibling file name.

/// Common English display names this dashboard offers in its language
/// picker, paired with the ISO 639-1 code used for the sibling file
/// name. Not exhaustive: anything not listed here falls back to its own
/// lowercased first two characters, which is already correct for a
/// caller that passes a code directly (e.g. `"fr"`, `"pt-BR"`).
const NAMED_CODES: &[(&str, &str)] = &[
    ("english", "en"),
    ("french", "fr"),
    ("spanish", "es"),
    ("german", "de"),
    ("italian", "it"),
    ("portuguese", "pt"),
    ("dutch", "nl"),
    ("russian", "ru"),
    ("polish", "pl"),
    ("turkish", "tr"),
    ("chinese", "zh"),
    ("japanese", "ja"),
    ("korean", "ko"),
    ("hebrew", "he"),
    ("arabic", "ar"),
    ("persian", "fa"),
    ("farsi", "fa"),
    ("urdu", "ur"),
    ("pashto", "ps"),
    ("hindi", "hi"),
    ("swedish", "sv"),
    ("norwegian", "no"),
    ("danish", "da"),
    ("finnish", "fi"),
    ("greek", "el"),
    ("czech", "cs"),
    ("romanian", "ro"),
    ("hungarian", "hu"),
    ("vietnamese", "vi"),
    ("thai", "th"),
    ("ukrainian", "uk"),
];

pub fn code_for(target_lang: &str) -> String {
    let lower = target_lang.trim().to_lowercase();
    if let Some((_, code)) = NAMED_CODES.iter().find(|(name, _)| *name == lower) {
        return code.to_string();
    }
    lower.chars().take(2).collect()
}
