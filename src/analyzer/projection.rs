//! Read-only projections for presentation.

use bytes::Bytes;

use super::ColorAnalyzer;
use crate::preview::PreviewHandle;
use crate::types::{ItemView, SessionId};

impl ColorAnalyzer {
    /// Project the active session for presentation.
    ///
    /// A pure read: never mutates session state, and preserves original
    /// session order regardless of the order in which items completed.
    /// Cache provenance (`from_cache`) passes through from the service
    /// payload without reinterpretation. Returns an empty vector when no
    /// session is active.
    pub async fn project(&self) -> Vec<ItemView> {
        let active = self.active.lock().await;
        match active.as_ref() {
            Some(session) => session
                .items()
                .iter()
                .enumerate()
                .map(|(index, item)| item.view(index))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Id of the active session, if any
    pub async fn session_id(&self) -> Option<SessionId> {
        self.active.lock().await.as_ref().map(|s| s.id)
    }

    /// Resolve a preview handle to its payload for rendering.
    ///
    /// Returns `None` once the handle has been released (cleared or
    /// superseded session).
    pub fn resolve_preview(&self, handle: PreviewHandle) -> Option<Bytes> {
        self.previews.resolve(handle)
    }

    /// Number of live preview handles.
    ///
    /// Equals the item count of the active session at every observation
    /// point — the no-leak/no-premature-revocation invariant.
    pub fn live_previews(&self) -> usize {
        self.previews.live_count()
    }
}
