//! File selection intake
//!
//! Turns a raw file selection into an ordered batch of candidate files:
//! non-image MIME types are rejected (counted, never admitted), and the
//! accepted sequence is truncated to the configured batch limit. Intake
//! never fails — an empty or fully-invalid selection just yields an empty
//! accepted list plus the counts.

use bytes::Bytes;

use crate::config::IntakeConfig;

/// One user-selected file under consideration
#[derive(Clone, Debug)]
pub struct SelectedFile {
    /// Display name (e.g., "cat.jpg")
    pub name: String,

    /// Declared MIME type (e.g., "image/jpeg")
    pub mime: String,

    /// Raw file payload
    pub payload: Bytes,
}

impl SelectedFile {
    /// Create a selected file from a name, MIME type, and payload.
    pub fn new(name: impl Into<String>, mime: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            payload: payload.into(),
        }
    }

    /// Whether the declared MIME type marks this file as an image
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

/// Outcome of running intake over a raw selection
#[derive(Clone, Debug, Default)]
pub struct IntakeOutcome {
    /// Accepted files, in original relative order
    pub accepted: Vec<SelectedFile>,

    /// Number of files rejected for not being images
    pub rejected: usize,

    /// Number of valid files dropped past the configured limit
    pub truncated: usize,
}

/// Filter and bound a raw selection per the intake contract.
///
/// Order is preserved: `accepted` keeps the input's relative order, and
/// truncation drops only the overflow past `cfg.max_batch_size`.
pub fn intake(files: Vec<SelectedFile>, cfg: &IntakeConfig) -> IntakeOutcome {
    let total = files.len();
    let mut accepted: Vec<SelectedFile> = files.into_iter().filter(SelectedFile::is_image).collect();
    let rejected = total - accepted.len();

    let truncated = match cfg.max_batch_size {
        Some(limit) if accepted.len() > limit => {
            let dropped = accepted.len() - limit;
            accepted.truncate(limit);
            dropped
        }
        _ => 0,
    };

    if rejected > 0 {
        tracing::warn!(rejected, "non-image files rejected at intake");
    }
    if truncated > 0 {
        tracing::warn!(truncated, limit = ?cfg.max_batch_size, "selection truncated to batch limit");
    }

    IntakeOutcome {
        accepted,
        rejected,
        truncated,
    }
}
