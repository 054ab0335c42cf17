use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit event types for the translation pipeline and batch workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    // System events
    ServiceStarted {
        version: String,
        config_hash: String,
    },
    ServiceStopped {
        reason: String,
    },

    // Translation gate / job lifecycle
    TranslationSubmitted {
        fingerprint: String,
        display_name: String,
        total_cues: usize,
    },
    TranslationStarted {
        fingerprint: String,
        queue_wait_ms: u64,
    },
    TranslationCompleted {
        fingerprint: String,
        completed_cues: usize,
        duration_ms: u64,
    },
    TranslationFailed {
        fingerprint: String,
        reason: String,
    },

    // Cache lifecycle
    CacheHit {
        fingerprint: String,
        lang: String,
    },
    CacheStored {
        fingerprint: String,
        lang: String,
    },
    CacheEvicted {
        fingerprint: String,
    },

    // Batch lifecycle
    BatchAnalyzeStarted {
        batch_id: String,
        folder: String,
    },
    BatchAnalyzeCompleted {
        batch_id: String,
        videos_found: usize,
    },
    BatchStarted {
        batch_id: String,
        target_lang: String,
    },
    BatchVideoCompleted {
        batch_id: String,
        video_path: String,
    },
    BatchVideoFailed {
        batch_id: String,
        video_path: String,
        reason: String,
    },
    BatchFinished {
        batch_id: String,
        status: String,
        completed: usize,
    },
}

impl AuditEvent {
    /// Returns the event type as a string for storage
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ServiceStarted { .. } => "service_started",
            Self::ServiceStopped { .. } => "service_stopped",
            Self::TranslationSubmitted { .. } => "translation_submitted",
            Self::TranslationStarted { .. } => "translation_started",
            Self::TranslationCompleted { .. } => "translation_completed",
            Self::TranslationFailed { .. } => "translation_failed",
            Self::CacheHit { .. } => "cache_hit",
            Self::CacheStored { .. } => "cache_stored",
            Self::CacheEvicted { .. } => "cache_evicted",
            Self::BatchAnalyzeStarted { .. } => "batch_analyze_started",
            Self::BatchAnalyzeCompleted { .. } => "batch_analyze_completed",
            Self::BatchStarted { .. } => "batch_started",
            Self::BatchVideoCompleted { .. } => "batch_video_completed",
            Self::BatchVideoFailed { .. } => "batch_video_failed",
            Self::BatchFinished { .. } => "batch_finished",
        }
    }

    /// Extract the fingerprint or batch id this event is about, if any.
    pub fn subject_id(&self) -> Option<&str> {
        match self {
            Self::ServiceStarted { .. } | Self::ServiceStopped { .. } => None,
            Self::TranslationSubmitted { fingerprint, .. }
            | Self::TranslationStarted { fingerprint, .. }
            | Self::TranslationCompleted { fingerprint, .. }
            | Self::TranslationFailed { fingerprint, .. }
            | Self::CacheHit { fingerprint, .. }
            | Self::CacheStored { fingerprint, .. }
            | Self::CacheEvicted { fingerprint } => Some(fingerprint),
            Self::BatchAnalyzeStarted { batch_id, .. }
            | Self::BatchAnalyzeCompleted { batch_id, .. }
            | Self::BatchStarted { batch_id, .. }
            | Self::BatchVideoCompleted { batch_id, .. }
            | Self::BatchVideoFailed { batch_id, .. }
            | Self::BatchFinished { batch_id, .. } => Some(batch_id),
        }
    }
}

/// A stored audit record with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub subject_id: Option<String>,
    pub data: AuditEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_service_started() {
        let event = AuditEvent::ServiceStarted {
            version: "0.1.0".to_string(),
            config_hash: "abc123".to_string(),
        };
        assert_eq!(event.event_type(), "service_started");
        assert_eq!(event.subject_id(), None);
    }

    #[test]
    fn test_event_type_translation_submitted() {
        let event = AuditEvent::TranslationSubmitted {
            fingerprint: "42".to_string(),
            display_name: "movie.srt".to_string(),
            total_cues: 120,
        };
        assert_eq!(event.event_type(), "translation_submitted");
        assert_eq!(event.subject_id(), Some("42"));
    }

    #[test]
    fn test_event_type_batch_started() {
        let event = AuditEvent::BatchStarted {
            batch_id: "b-1".to_string(),
            target_lang: "es".to_string(),
        };
        assert_eq!(event.event_type(), "batch_started");
        assert_eq!(event.subject_id(), Some("b-1"));
    }

    #[test]
    fn test_serialize_deserialize_translation_completed() {
        let event = AuditEvent::TranslationCompleted {
            fingerprint: "42".to_string(),
            completed_cues: 10,
            duration_ms: 500,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"translation_completed\""));

        let deserialized: AuditEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.event_type(), "translation_completed");
    }

    #[test]
    fn test_audit_record_serialize() {
        let record = AuditRecord {
            id: 1,
            timestamp: Utc::now(),
            event_type: "service_started".to_string(),
            subject_id: None,
            data: AuditEvent::ServiceStarted {
                version: "0.1.0".to_string(),
                config_hash: "abc123".to_string(),
            },
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"id\":1"));
        assert!(json.contains("\"event_type\":\"service_started\""));
    }
}
