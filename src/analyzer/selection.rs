//! File selection and session replacement.

use std::sync::atomic::Ordering;

use super::ColorAnalyzer;
use crate::error::Result;
use crate::intake::{intake, SelectedFile};
use crate::session::{BatchSession, SessionItem};
use crate::types::{Event, SelectionSummary, SessionId};

impl ColorAnalyzer {
    /// Run intake over a raw selection and, if anything was accepted,
    /// replace the active session with a new one.
    ///
    /// Replacement is atomic with respect to resources: the previous
    /// session's preview handles are released under the same lock that
    /// installs the new session, so no observation point sees handles from
    /// two sessions at once. An intake that accepts nothing (empty or
    /// fully-invalid selection) leaves the existing session untouched.
    ///
    /// Rejection and truncation counts are reported both in the returned
    /// [`SelectionSummary`] and as [`Event::FilesRejected`] /
    /// [`Event::BatchTruncated`] warning signals.
    pub async fn select_files(&self, files: Vec<SelectedFile>) -> Result<SelectionSummary> {
        let outcome = intake(files, &self.config.intake);

        if outcome.rejected > 0 {
            self.emit_event(Event::FilesRejected {
                count: outcome.rejected,
            });
        }
        if outcome.truncated > 0 {
            self.emit_event(Event::BatchTruncated {
                dropped: outcome.truncated,
                limit: self.config.intake.max_batch_size.unwrap_or(0),
            });
        }

        if outcome.accepted.is_empty() {
            tracing::debug!(
                rejected = outcome.rejected,
                "selection produced no items; existing session untouched"
            );
            return Ok(SelectionSummary {
                session: None,
                accepted: 0,
                rejected: outcome.rejected,
                truncated: outcome.truncated,
            });
        }

        let accepted = outcome.accepted.len();
        let id = SessionId::new(self.next_session_id.fetch_add(1, Ordering::Relaxed));

        // Release the old handles and acquire the new ones under the session
        // lock, so the live handle count never exceeds the item count of
        // whichever session is installed.
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            self.previews.release_all(&previous.preview_handles());
            self.emit_event(Event::SessionCleared {
                session: previous.id,
            });
        }
        let items: Vec<SessionItem> = outcome
            .accepted
            .into_iter()
            .map(|file| {
                let preview = self.previews.acquire(file.payload.clone());
                SessionItem::new(file, preview)
            })
            .collect();
        *active = Some(BatchSession::new(id, items));
        drop(active);

        tracing::info!(session = %id, items = accepted, "session created");
        self.emit_event(Event::SessionCreated {
            session: id,
            items: accepted,
        });

        Ok(SelectionSummary {
            session: Some(id),
            accepted,
            rejected: outcome.rejected,
            truncated: outcome.truncated,
        })
    }

    /// Clear the active session and release every preview handle it owned.
    ///
    /// A no-op when no session is active. In-flight responses belonging to
    /// the cleared session are dropped by the stale-response guard.
    pub async fn clear(&self) {
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            self.previews.release_all(&previous.preview_handles());
            drop(active);
            tracing::info!(session = %previous.id, "session cleared");
            self.emit_event(Event::SessionCleared {
                session: previous.id,
            });
        }
    }
}
