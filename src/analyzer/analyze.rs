//! Dispatching a session to the analysis service.
//!
//! Implements both dispatch policies behind one `analyze()` entry point:
//!
//! - **Sequential per item**: one request per pending item, issued
//!   strictly in session order, one at a time. The orchestrator suspends
//!   awaiting item *i*'s response before issuing item *i+1*'s request, so
//!   progress reporting is monotonic left-to-right. A failure on one item
//!   never prevents dispatch of the next.
//! - **Batched single request**: one multipart request carrying every
//!   pending item's payload; exactly one suspension point. A
//!   request-level failure fails the whole batch with one message; an
//!   embedded per-entry error fails only that entry's item.
//!
//! Every mutation is gated by the stale-response guard: the session id is
//! captured before the first suspension and re-checked under the lock
//! before each status write, so a response that outlives its session is
//! dropped instead of corrupting the replacement.

use super::ColorAnalyzer;
use crate::config::{DispatchPolicy, LoadingMark};
use crate::error::{Result, GENERIC_ERROR_MESSAGE};
use crate::intake::SelectedFile;
use crate::service::EntryOutcome;
use crate::types::{Event, SessionId};

/// A pending item's position plus a cheap copy of its upload payload,
/// captured under the lock so dispatch can run without holding it.
struct PendingUpload {
    index: usize,
    file: SelectedFile,
}

impl ColorAnalyzer {
    /// Analyze every pending item in the active session.
    ///
    /// Items already `Loading`, `Done`, or `Error` are skipped, so
    /// re-invoking this while a dispatch is in flight cannot duplicate
    /// submissions. At most one request attempt is made per item per
    /// invocation; there are no automatic retries. With no active session
    /// or no pending items this is a no-op.
    pub async fn analyze(&self) -> Result<()> {
        let (session_id, pending) = {
            let mut active = self.active.lock().await;
            let Some(session) = active.as_mut() else {
                tracing::debug!("analyze called with no active session");
                return Ok(());
            };
            let session_id = session.id;

            let indices = session.pending_indices();
            if indices.is_empty() {
                tracing::debug!(session = %session_id, "no pending items to analyze");
                return Ok(());
            }

            let pending: Vec<PendingUpload> = indices
                .iter()
                .filter_map(|&index| {
                    session.items().get(index).map(|item| PendingUpload {
                        index,
                        file: SelectedFile {
                            name: item.name.clone(),
                            mime: item.mime.clone(),
                            payload: item.payload.clone(),
                        },
                    })
                })
                .collect();

            // Batched dispatch has a single suspension point, so the whole
            // batch is marked Loading before it. Sequential dispatch marks
            // up front or per item depending on configuration.
            let mark_up_front = self.config.dispatch == DispatchPolicy::BatchedSingleRequest
                || self.config.loading_mark == LoadingMark::UpFront;
            if mark_up_front {
                for &index in &indices {
                    if let Some(item) = session.item_mut(index) {
                        if item.begin() {
                            self.emit_event(Event::ItemLoading {
                                session: session_id,
                                index,
                            });
                        }
                    }
                }
            }

            (session_id, pending)
        };

        tracing::info!(
            session = %session_id,
            items = pending.len(),
            dispatch = ?self.config.dispatch,
            "starting analysis"
        );

        match self.config.dispatch {
            DispatchPolicy::SequentialPerItem => {
                self.dispatch_sequential(session_id, pending).await;
            }
            DispatchPolicy::BatchedSingleRequest => {
                self.dispatch_batched(session_id, pending).await;
            }
        }

        Ok(())
    }

    /// One request per item, in session order, awaiting each outcome
    /// before issuing the next request.
    async fn dispatch_sequential(&self, session_id: SessionId, pending: Vec<PendingUpload>) {
        for upload in pending {
            // Re-check ownership before every request so a superseded
            // session stops consuming the wire, not just the state.
            {
                let mut active = self.active.lock().await;
                let Some(session) = active.as_mut().filter(|s| s.id == session_id) else {
                    tracing::debug!(session = %session_id, "session superseded; stopping dispatch");
                    return;
                };
                if self.config.loading_mark == LoadingMark::PerItem {
                    if let Some(item) = session.item_mut(upload.index) {
                        if item.begin() {
                            self.emit_event(Event::ItemLoading {
                                session: session_id,
                                index: upload.index,
                            });
                        }
                    }
                }
            }

            let outcome = match self.service.analyze(&[&upload.file]).await {
                Ok(outcomes) => outcomes
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| Err(GENERIC_ERROR_MESSAGE.to_string())),
                Err(e) => Err(e.surface_message()),
            };

            self.apply(session_id, upload.index, outcome).await;
        }
    }

    /// One multipart request carrying the whole batch.
    async fn dispatch_batched(&self, session_id: SessionId, pending: Vec<PendingUpload>) {
        let files: Vec<&SelectedFile> = pending.iter().map(|p| &p.file).collect();

        match self.service.analyze(&files).await {
            Ok(outcomes) => {
                // The service client guarantees one outcome per submitted
                // file, in submission order.
                for (upload, outcome) in pending.iter().zip(outcomes) {
                    self.apply(session_id, upload.index, outcome).await;
                }
            }
            Err(e) => {
                let message = e.surface_message();
                tracing::warn!(
                    session = %session_id,
                    error = %message,
                    "batched analyze request failed"
                );
                for upload in &pending {
                    self.apply(session_id, upload.index, Err(message.clone()))
                        .await;
                }
            }
        }
    }

    /// Apply one item outcome, gated by the stale-response guard.
    async fn apply(&self, session_id: SessionId, index: usize, outcome: EntryOutcome) {
        let mut active = self.active.lock().await;
        let Some(session) = active.as_mut().filter(|s| s.id == session_id) else {
            tracing::debug!(session = %session_id, index, "dropping stale response");
            return;
        };
        let Some(item) = session.item_mut(index) else {
            return;
        };

        match outcome {
            Ok(report) => {
                let from_cache = report.from_cache;
                if item.complete(report) {
                    tracing::debug!(session = %session_id, index, from_cache, "item analyzed");
                    self.emit_event(Event::ItemAnalyzed {
                        session: session_id,
                        index,
                        from_cache,
                    });
                }
            }
            Err(message) => {
                if item.fail(message.clone()) {
                    tracing::warn!(
                        session = %session_id,
                        index,
                        error = %message,
                        "item analysis failed"
                    );
                    self.emit_event(Event::ItemFailed {
                        session: session_id,
                        index,
                        error: message,
                    });
                }
            }
        }
    }
}
