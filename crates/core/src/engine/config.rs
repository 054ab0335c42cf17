/// Auto-tuning knobs for the translation engine, keyed off the active
/// LLM provider. Local/self-hosted providers get a smaller batch and
/// less fan-out than cloud providers, matching the spec's
/// `(batch=20, threads=6)` vs `(batch=50, threads=8)` defaults.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub local_batch_size: usize,
    pub local_threads: usize,
    pub cloud_batch_size: usize,
    pub cloud_threads: usize,
    /// Overrides the auto-tuned batch size regardless of provider,
    /// mirroring `Settings::translation_batch_size`.
    pub batch_size_override: Option<usize>,
    pub skip_hearing_impaired: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            local_batch_size: 20,
            local_threads: 6,
            cloud_batch_size: 50,
            cloud_threads: 8,
            batch_size_override: None,
            skip_hearing_impaired: false,
        }
    }
}

impl EngineConfig {
    /// `(batch_size, parallel_threads)` for the given provider name.
    /// Providers other than `"ollama"` are treated as cloud-hosted.
    pub fn tuning_for(&self, provider: &str) -> (usize, usize) {
        let (auto_batch, threads) = if provider == "ollama" {
            (self.local_batch_size, self.local_threads)
        } else {
            (self.cloud_batch_size, self.cloud_threads)
        };
        (self.batch_size_override.unwrap_or(auto_batch), threads)
    }
}
