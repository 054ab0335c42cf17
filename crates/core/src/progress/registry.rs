//! The translation gate and progress registry.
//!
//! These are one concurrency unit: the gate (`tokio::sync::Mutex<()>`,
//! capacity one) is the only global serialization point for translation
//! work, and the job map gives the dashboard visibility into who is
//! waiting and who is running. Mirrors the
//! `Arc<RwLock<HashMap<String, ActiveDownload>>>` shape used for
//! in-flight work elsewhere in this crate, paired with a FIFO mutex
//! instead of a semaphore since capacity is always exactly one.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::types::{JobStatus, TranslationJob};

/// In-memory registry of active and pending translation jobs, guarding
/// admission through a single-slot gate.
pub struct ProgressRegistry {
    jobs: RwLock<HashMap<String, TranslationJob>>,
    gate: Arc<Mutex<()>>,
}

impl Default for ProgressRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressRegistry {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Register `fingerprint` as `Pending`, then block until it acquires
    /// the gate and becomes `Active`. The returned guard releases the
    /// gate and removes the job entry when dropped (or when `end` is
    /// called explicitly from a failure path).
    pub async fn begin(
        self: &Arc<Self>,
        fingerprint: impl Into<String>,
        display_name: impl Into<String>,
        total_cues: usize,
    ) -> JobGuard {
        let fingerprint = fingerprint.into();
        {
            let mut jobs = self.jobs.write().unwrap();
            jobs.insert(
                fingerprint.clone(),
                TranslationJob {
                    fingerprint: fingerprint.clone(),
                    display_name: display_name.into(),
                    total_cues,
                    completed_cues: 0,
                    start_time: Utc::now(),
                    status: JobStatus::Pending,
                },
            );
        }

        let permit = Arc::clone(&self.gate).lock_owned().await;

        {
            let mut jobs = self.jobs.write().unwrap();
            if let Some(job) = jobs.get_mut(&fingerprint) {
                job.status = JobStatus::Active;
            }
        }

        JobGuard {
            registry: Arc::clone(self),
            fingerprint,
            _permit: permit,
        }
    }

    /// Advance reported progress for an active job. A no-op if the
    /// fingerprint is unknown (job already ended).
    pub fn update(&self, fingerprint: &str, completed_cues: usize) {
        if let Some(job) = self.jobs.write().unwrap().get_mut(fingerprint) {
            job.completed_cues = completed_cues;
        }
    }

    /// Remove the job entry. Idempotent: removing an absent fingerprint
    /// is a no-op, so this is safe to call from any failure path
    /// (including twice, from both an explicit call and `Drop`).
    pub fn end(&self, fingerprint: &str) {
        self.jobs.write().unwrap().remove(fingerprint);
    }

    /// Point-in-time copy of every active and pending job.
    pub fn snapshot(&self) -> Vec<TranslationJob> {
        let mut jobs: Vec<_> = self.jobs.read().unwrap().values().cloned().collect();
        jobs.sort_by_key(|j| j.start_time);
        jobs
    }

    /// 0-indexed position among other `Pending` jobs, ordered by
    /// submission time. `None` once the job is `Active` or gone.
    pub fn pending_position(&self, fingerprint: &str) -> Option<usize> {
        let jobs = self.jobs.read().unwrap();
        let target = jobs.get(fingerprint)?;
        if target.status != JobStatus::Pending {
            return None;
        }
        let position = jobs
            .values()
            .filter(|j| j.status == JobStatus::Pending && j.start_time <= target.start_time)
            .count()
            .saturating_sub(1);
        Some(position)
    }
}

/// RAII handle to a held translation-gate slot. Dropping it releases the
/// gate and removes the job entry; `update` reports progress while held.
pub struct JobGuard {
    registry: Arc<ProgressRegistry>,
    fingerprint: String,
    _permit: OwnedMutexGuard<()>,
}

impl JobGuard {
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn update(&self, completed_cues: usize) {
        self.registry.update(&self.fingerprint, completed_cues);
    }

    /// Explicitly end the job (e.g. from a failure path) ahead of drop.
    pub fn end(self) {
        // Drop does the work; this just gives call sites a readable name.
    }
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        self.registry.end(&self.fingerprint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn begin_without_contention_goes_active_immediately() {
        let registry = Arc::new(ProgressRegistry::new());
        let guard = registry.begin("fp-1", "movie.srt", 10).await;
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].status, JobStatus::Active);
        drop(guard);
        assert!(registry.snapshot().is_empty());
    }

    #[tokio::test]
    async fn at_most_one_active_job_at_a_time() {
        let registry = Arc::new(ProgressRegistry::new());
        let first = registry.begin("fp-a", "a.srt", 5).await;

        let registry2 = Arc::clone(&registry);
        let second_handle = tokio::spawn(async move { registry2.begin("fp-b", "b.srt", 5).await });

        tokio::time::sleep(Duration::from_millis(30)).await;
        let snapshot = registry.snapshot();
        let active_count = snapshot
            .iter()
            .filter(|j| j.status == JobStatus::Active)
            .count();
        let pending_count = snapshot
            .iter()
            .filter(|j| j.status == JobStatus::Pending)
            .count();
        assert_eq!(active_count, 1);
        assert_eq!(pending_count, 1);

        drop(first);
        let second = second_handle.await.unwrap();
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].status, JobStatus::Active);
        assert_eq!(snapshot[0].fingerprint, "fp-b");
        drop(second);
    }

    #[tokio::test]
    async fn update_advances_completed_cues() {
        let registry = Arc::new(ProgressRegistry::new());
        let guard = registry.begin("fp-1", "movie.srt", 10).await;
        guard.update(4);
        assert_eq!(registry.snapshot()[0].completed_cues, 4);
    }

    #[tokio::test]
    async fn end_is_idempotent() {
        let registry = Arc::new(ProgressRegistry::new());
        registry.end("never-existed");
        let guard = registry.begin("fp-1", "movie.srt", 1).await;
        registry.end(guard.fingerprint());
        registry.end(guard.fingerprint());
        drop(guard);
        assert!(registry.snapshot().is_empty());
    }
}
