use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of the single process-wide batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Analyzing,
    Translating,
    Completed,
    Failed,
    Cancelled,
}

impl BatchStatus {
    /// Whether a batch in this status blocks a new `analyze`/`start` call.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BatchStatus::Completed | BatchStatus::Failed | BatchStatus::Cancelled
        )
    }
}

/// One video discovered during `analyze`, carrying the embedded track
/// selected for translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchVideo {
    pub path: String,
    pub file_name: String,
    pub track_index: usize,
    pub language: String,
}

/// The single process-wide batch record. At most one exists at a time;
/// a new `analyze` call while the current one isn't terminal is
/// rejected with `BatchError::Busy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRecord {
    pub batch_id: String,
    pub folder: String,
    pub videos: Vec<BatchVideo>,
    pub total: usize,
    pub completed: usize,
    pub current_video: Option<String>,
    pub start_time: DateTime<Utc>,
    pub status: BatchStatus,
    pub error: Option<String>,
}

impl BatchRecord {
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            batch_id: Uuid::new_v4().to_string(),
            folder: folder.into(),
            videos: Vec::new(),
            total: 0,
            completed: 0,
            current_video: None,
            start_time: Utc::now(),
            status: BatchStatus::Analyzing,
            error: None,
        }
    }
}
