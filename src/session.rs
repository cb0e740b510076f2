//! Batch session state
//!
//! A [`BatchSession`] is the ordered set of items selected together for one
//! analysis action. Exactly one session is active at a time; replacing or
//! clearing it releases every preview handle it owned. Item status moves
//! one way only — the transition methods refuse reverse moves so a late
//! writer can never resurrect a terminal item.

use bytes::Bytes;

use crate::intake::SelectedFile;
use crate::preview::PreviewHandle;
use crate::types::{AnalysisReport, ItemStatus, ItemView, SessionId};

/// One image inside the active session
#[derive(Clone, Debug)]
pub struct SessionItem {
    /// Display name of the source file
    pub name: String,

    /// Declared MIME type
    pub mime: String,

    /// Raw payload, shared cheaply with outgoing requests
    pub payload: Bytes,

    /// Preview handle owned exclusively by this item
    pub preview: PreviewHandle,

    status: ItemStatus,
    report: Option<AnalysisReport>,
    error: Option<String>,
}

impl SessionItem {
    /// Build an item from an accepted file and its acquired preview handle.
    pub fn new(file: SelectedFile, preview: PreviewHandle) -> Self {
        Self {
            name: file.name,
            mime: file.mime,
            payload: file.payload,
            preview,
            status: ItemStatus::Pending,
            report: None,
            error: None,
        }
    }

    /// Current lifecycle status
    pub fn status(&self) -> ItemStatus {
        self.status
    }

    /// Analysis payload; present iff status is `Done`
    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    /// Surfaced error message; present iff status is `Error`
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Mark the item's request as in flight (`Pending -> Loading`).
    ///
    /// Returns `false` without mutating when the item already left
    /// `Pending`, which is what makes re-invoking analyze a no-op for
    /// in-flight and finished items.
    pub fn begin(&mut self) -> bool {
        if self.status != ItemStatus::Pending {
            return false;
        }
        self.status = ItemStatus::Loading;
        true
    }

    /// Record a successful analysis (`Pending|Loading -> Done`).
    pub fn complete(&mut self, report: AnalysisReport) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = ItemStatus::Done;
        self.report = Some(report);
        self.error = None;
        true
    }

    /// Record a failed analysis (`Pending|Loading -> Error`).
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = ItemStatus::Error;
        self.error = Some(message.into());
        self.report = None;
        true
    }

    /// Project this item for presentation.
    pub fn view(&self, index: usize) -> ItemView {
        ItemView {
            index,
            name: self.name.clone(),
            mime: self.mime.clone(),
            preview: self.preview,
            status: self.status,
            report: self.report.clone(),
            error: self.error.clone(),
        }
    }
}

/// Ordered sequence of items selected together for one analysis action
///
/// Insertion order == display order == dispatch order.
#[derive(Clone, Debug)]
pub struct BatchSession {
    /// Identity of this session, used by the stale-response guard
    pub id: SessionId,

    items: Vec<SessionItem>,
}

impl BatchSession {
    /// Create a session from already-built items.
    pub fn new(id: SessionId, items: Vec<SessionItem>) -> Self {
        Self { id, items }
    }

    /// Number of items in the session
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the session holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Immutable access to the ordered items
    pub fn items(&self) -> &[SessionItem] {
        &self.items
    }

    /// Mutable access to one item by position
    pub fn item_mut(&mut self, index: usize) -> Option<&mut SessionItem> {
        self.items.get_mut(index)
    }

    /// Every preview handle owned by the session, for bulk release
    pub fn preview_handles(&self) -> Vec<PreviewHandle> {
        self.items.iter().map(|item| item.preview).collect()
    }

    /// Positions of items still awaiting dispatch
    pub fn pending_indices(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.status() == ItemStatus::Pending)
            .map(|(i, _)| i)
            .collect()
    }
}
