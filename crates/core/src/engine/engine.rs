use std::sync::Arc;

use tracing::{debug, warn};

use crate::bidi;
use crate::codec::Cue;

use super::config::EngineConfig;
use super::error::EngineError;
use super::llm::{CompletionRequest, LlmClient};
use super::parse::parse_markers;
use super::prompt::{is_hearing_impaired, system_prompt, user_prompt};
use super::linecount::enforce_line_count;

/// Cue-batching LLM driver. Builds prompts, parses marker-tagged
/// responses, enforces per-cue line counts, and applies the bidi
/// post-processor. See spec §4.5 for the full pipeline this implements.
pub struct TranslationEngine {
    llm: Arc<dyn LlmClient>,
    config: EngineConfig,
}

impl TranslationEngine {
    pub fn new(llm: Arc<dyn LlmClient>, config: EngineConfig) -> Self {
        Self { llm, config }
    }

    /// Translate every cue, preserving count, timing, and per-cue line
    /// count. Never raises for partial per-cue failure -- callers get a
    /// best-effort `Ok` with some cues falling back to their original
    /// text; `progress` (if given) is invoked with the cumulative
    /// completed-cue count after each batch.
    pub async fn translate_cues(
        &self,
        cues: &[Cue],
        target_lang: &str,
        progress: Option<&(dyn Fn(usize) + Send + Sync)>,
    ) -> Result<Vec<Cue>, EngineError> {
        if cues.is_empty() {
            return Ok(Vec::new());
        }

        let is_rtl = bidi::is_rtl_language(target_lang);
        let (batch_size, threads) = self.config.tuning_for(self.llm.provider());

        let mut results: Vec<Cue> = Vec::with_capacity(cues.len());
        let mut completed = 0usize;

        for chunk in cues.chunks(batch_size.max(1)) {
            let translated_texts = self.translate_batch(chunk, target_lang, is_rtl, threads).await;
            if !translated_texts.batch_ok && !translated_texts.any_translated {
                warn!(
                    "batch of {} cue(s) kept verbatim, batch and per-cue fallback both failed",
                    chunk.len()
                );
            }

            for (cue, text) in chunk.iter().zip(translated_texts.texts.into_iter()) {
                results.push(Cue {
                    index: cue.index,
                    start: cue.start,
                    end: cue.end,
                    text,
                });
            }

            completed += chunk.len();
            if let Some(cb) = progress {
                cb(completed);
            }
        }

        Ok(results)
    }

    async fn translate_batch(
        &self,
        chunk: &[Cue],
        target_lang: &str,
        is_rtl: bool,
        threads: usize,
    ) -> BatchOutcome {
        let translate_indices: Vec<usize> = chunk
            .iter()
            .enumerate()
            .filter(|(_, cue)| {
                !(self.config.skip_hearing_impaired && is_hearing_impaired(&cue.text))
            })
            .map(|(i, _)| i)
            .collect();

        if translate_indices.is_empty() {
            return BatchOutcome {
                texts: chunk.iter().map(|c| c.text.clone()).collect(),
                batch_ok: true,
                any_translated: false,
            };
        }

        let subset: Vec<&Cue> = translate_indices.iter().map(|&i| &chunk[i]).collect();
        let system = system_prompt(target_lang, is_rtl);
        let user = user_prompt(&subset);

        let mut texts: Vec<String> = chunk.iter().map(|c| c.text.clone()).collect();

        match self
            .llm
            .complete(
                CompletionRequest::new(user)
                    .with_system(system)
                    .with_max_tokens(4096),
            )
            .await
        {
            Ok(response) => {
                let parsed = parse_markers(&response.text);
                if parsed.is_empty() {
                    warn!("translation batch returned no parseable markers, falling back to per-cue translation");
                    let fallback = self.translate_fallback(&subset, target_lang, is_rtl, threads).await;
                    for (pos, &orig_idx) in translate_indices.iter().enumerate() {
                        texts[orig_idx] = fallback.texts[pos].clone();
                    }
                    return BatchOutcome {
                        texts,
                        batch_ok: false,
                        any_translated: fallback.any_translated,
                    };
                }

                for (pos, &orig_idx) in translate_indices.iter().enumerate() {
                    let cue = &chunk[orig_idx];
                    let line_count = cue.text.lines().count().max(1);
                    match parsed.get(&pos) {
                        Some(translation) => {
                            let enforced = enforce_line_count(line_count, translation);
                            texts[orig_idx] = bidi::process(&enforced, target_lang);
                        }
                        None => {
                            debug!(
                                "translation response missing marker for cue {orig_idx}, keeping original"
                            );
                        }
                    }
                }

                BatchOutcome {
                    texts,
                    batch_ok: true,
                    any_translated: true,
                }
            }
            Err(e) => {
                warn!("translation batch call failed ({e}), falling back to per-cue translation");
                let fallback = self.translate_fallback(&subset, target_lang, is_rtl, threads).await;
                for (pos, &orig_idx) in translate_indices.iter().enumerate() {
                    texts[orig_idx] = fallback.texts[pos].clone();
                }
                BatchOutcome {
                    texts,
                    batch_ok: false,
                    any_translated: fallback.any_translated,
                }
            }
        }
    }

    /// Per-cue scatter/gather fallback, capped at `threads` in flight at
    /// once. Each cue that still fails keeps its original text verbatim.
    async fn translate_fallback(
        &self,
        subset: &[&Cue],
        target_lang: &str,
        is_rtl: bool,
        threads: usize,
    ) -> BatchOutcome {
        let mut texts = Vec::with_capacity(subset.len());
        let mut any_translated = false;

        for group in subset.chunks(threads.max(1)) {
            let futures = group.iter().map(|cue| self.translate_single(cue, target_lang, is_rtl));
            let outcomes = futures::future::join_all(futures).await;
            for outcome in outcomes {
                any_translated |= outcome.1;
                texts.push(outcome.0);
            }
        }

        BatchOutcome {
            texts,
            batch_ok: false,
            any_translated,
        }
    }

    async fn translate_single(&self, cue: &Cue, target_lang: &str, is_rtl: bool) -> (String, bool) {
        if self.config.skip_hearing_impaired && is_hearing_impaired(&cue.text) {
            return (cue.text.clone(), false);
        }

        let system = system_prompt(target_lang, is_rtl);
        let user = format!("<<~0~>> {}\n", cue.text.replace('\n', " || "));

        match self
            .llm
            .complete(CompletionRequest::new(user).with_system(system).with_max_tokens(512))
            .await
        {
            Ok(response) => {
                let parsed = parse_markers(&response.text);
                let translation = parsed.get(&0).cloned().unwrap_or_else(|| response.text.clone());
                if translation.trim().is_empty() {
                    (cue.text.clone(), false)
                } else {
                    let line_count = cue.text.lines().count().max(1);
                    let enforced = enforce_line_count(line_count, &translation);
                    (bidi::process(&enforced, target_lang), true)
                }
            }
            Err(e) => {
                warn!("per-cue translation fallback failed: {e}");
                (cue.text.clone(), false)
            }
        }
    }
}

struct BatchOutcome {
    texts: Vec<String>,
    batch_ok: bool,
    any_translated: bool,
}
