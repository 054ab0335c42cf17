use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A translation work item's lifecycle state. `Pending` while waiting on
/// the gate, `Active` once it holds the single translation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Active,
}

/// One entry in the progress registry, as surfaced to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationJob {
    pub fingerprint: String,
    pub display_name: String,
    pub total_cues: usize,
    pub completed_cues: usize,
    pub start_time: DateTime<Utc>,
    pub status: JobStatus,
}
