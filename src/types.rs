//! Core types for color-analyzer

use serde::{Deserialize, Serialize};

use crate::preview::PreviewHandle;

/// Unique identifier for a batch session
///
/// Session identity is the backbone of the stale-response guard: the
/// orchestrator captures the id at dispatch time and refuses to apply any
/// response once the active session's id has moved on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl SessionId {
    /// Create a new SessionId
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner u64 value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-item lifecycle status
///
/// Transitions are monotonic along `Pending -> Loading -> {Done, Error}`.
/// The only reverse path is a full session replacement, which discards the
/// item entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Accepted by intake, not yet dispatched
    Pending,
    /// Request in flight
    Loading,
    /// Analysis succeeded; a report is attached
    Done,
    /// Analysis failed; an error message is attached
    Error,
}

impl ItemStatus {
    /// Whether the item has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Done | ItemStatus::Error)
    }
}

/// One entry in an image's dominant-color breakdown
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorShare {
    /// Color as a hex string (e.g., "#a0522d")
    pub hex: String,

    /// Share of the image covered by this color, in percent
    pub percentage: f32,
}

/// The closest trained color match for an image
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClosestMatch {
    /// Name of the matched color
    pub name: String,

    /// Similarity to the match, in percent
    pub similarity: f32,

    /// Color-space distance to the match (lower is closer)
    pub distance: f32,
}

/// Analysis payload returned by the service for one image
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Dominant color breakdown; percentages sum to ~100 modulo rounding
    pub dominant_colors: Vec<ColorShare>,

    /// Best match among the service's trained colors
    pub closest_match: ClosestMatch,

    /// Whether the service answered from its cache
    #[serde(alias = "cached")]
    pub from_cache: bool,

    /// Free-form note from the service (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A color the service has been trained on
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainedColor {
    /// Service-side identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Reference colors backing the trained entry, as hex strings
    #[serde(default)]
    pub reference_colors: Vec<String>,
}

/// Summary returned by a file selection operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionSummary {
    /// Id of the newly created session; `None` when nothing was accepted
    /// and the previous session (if any) was left untouched
    pub session: Option<SessionId>,

    /// Number of files accepted into the session
    pub accepted: usize,

    /// Number of files rejected for not being images
    pub rejected: usize,

    /// Number of valid files dropped past the configured batch limit
    pub truncated: usize,
}

/// Read-only projection of one session item for presentation
///
/// Produced by [`ColorAnalyzer::project`](crate::ColorAnalyzer::project) in
/// session order, regardless of completion order.
#[derive(Clone, Debug)]
pub struct ItemView {
    /// Position within the session (insertion order == display order)
    pub index: usize,

    /// Display name of the source file
    pub name: String,

    /// Declared MIME type of the source file
    pub mime: String,

    /// Revocable handle for rendering a local preview
    pub preview: PreviewHandle,

    /// Current lifecycle status
    pub status: ItemStatus,

    /// Analysis payload; present iff status is `Done`
    pub report: Option<AnalysisReport>,

    /// Surfaced error message; present iff status is `Error`
    pub error: Option<String>,
}

impl ItemView {
    /// Cache provenance passed through from the report, if one is present
    pub fn from_cache(&self) -> Option<bool> {
        self.report.as_ref().map(|r| r.from_cache)
    }
}

/// Event emitted during the selection/analysis lifecycle
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A new session replaced the previous one
    SessionCreated {
        /// New session id
        session: SessionId,
        /// Number of items in the session
        items: usize,
    },

    /// Non-image files were rejected at intake
    FilesRejected {
        /// Number of rejected files
        count: usize,
    },

    /// Valid files were dropped past the configured batch limit
    BatchTruncated {
        /// Number of files dropped
        dropped: usize,
        /// The configured limit that was exceeded
        limit: usize,
    },

    /// An item's request is in flight
    ItemLoading {
        /// Session owning the item
        session: SessionId,
        /// Item position within the session
        index: usize,
    },

    /// An item's analysis completed successfully
    ItemAnalyzed {
        /// Session owning the item
        session: SessionId,
        /// Item position within the session
        index: usize,
        /// Whether the service answered from cache
        from_cache: bool,
    },

    /// An item's analysis failed
    ItemFailed {
        /// Session owning the item
        session: SessionId,
        /// Item position within the session
        index: usize,
        /// Surfaced error message
        error: String,
    },

    /// The active session was cleared and its previews released
    SessionCleared {
        /// Id of the cleared session
        session: SessionId,
    },

    /// The server-side cache was cleared (local session was reset too)
    CacheCleared,

    /// A training batch was accepted by the service
    TrainingComplete {
        /// Name the images were trained under
        color_name: String,
        /// Acknowledgement message from the service
        message: String,
    },
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_are_done_and_error_only() {
        assert!(!ItemStatus::Pending.is_terminal());
        assert!(!ItemStatus::Loading.is_terminal());
        assert!(ItemStatus::Done.is_terminal());
        assert!(ItemStatus::Error.is_terminal());
    }

    #[test]
    fn report_deserializes_cached_alias() {
        let json = r##"{
            "dominant_colors": [{"hex": "#112233", "percentage": 100.0}],
            "closest_match": {"name": "chestnut", "similarity": 91.5, "distance": 4.2},
            "cached": true
        }"##;
        let report: AnalysisReport = serde_json::from_str(json).unwrap();
        assert!(report.from_cache, "`cached` must alias `from_cache`");
        assert!(report.message.is_none());
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let event = Event::ItemFailed {
            session: SessionId::new(4),
            index: 1,
            error: "boom".into(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "item_failed");
        assert_eq!(value["session"], 4);
        assert_eq!(value["index"], 1);
    }

    #[test]
    fn trained_color_tolerates_missing_reference_colors() {
        let color: TrainedColor =
            serde_json::from_str(r#"{"id": "c1", "name": "auburn"}"#).unwrap();
        assert!(color.reference_colors.is_empty());
    }

    #[test]
    fn session_id_display_matches_inner_value() {
        assert_eq!(SessionId::new(17).to_string(), "17");
        assert_eq!(SessionId::new(17).get(), 17);
    }
}
