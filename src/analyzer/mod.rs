//! Core analyzer implementation split into focused submodules.
//!
//! The `ColorAnalyzer` struct and its methods are organized by domain:
//! - [`selection`] - File selection and session replacement
//! - [`analyze`] - Dispatching a session to the service
//! - [`projection`] - Read-only projections for presentation
//! - [`training`] - Training workflow and cache control

mod analyze;
mod projection;
mod selection;
mod training;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::preview::PreviewRegistry;
use crate::service::AnalysisService;
use crate::session::BatchSession;
use crate::types::Event;

/// Main analyzer instance (cloneable - all fields are Arc-wrapped)
///
/// Owns the single active [`BatchSession`], the preview registry, the
/// service client, and the event broadcast channel. The session slot is
/// guarded by one async mutex; only the orchestrator and the session
/// replacement/clear operations ever write through it, preserving the
/// single-writer discipline on item state.
#[derive(Clone)]
pub struct ColorAnalyzer {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// HTTP client for the remote analysis service
    pub(crate) service: AnalysisService,
    /// Registry of live preview handles
    pub(crate) previews: Arc<PreviewRegistry>,
    /// The single active session slot (None until a selection is made)
    pub(crate) active: Arc<tokio::sync::Mutex<Option<BatchSession>>>,
    /// Monotonic counter backing session identity
    pub(crate) next_session_id: Arc<AtomicU64>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
}

impl ColorAnalyzer {
    /// Create a new ColorAnalyzer instance
    ///
    /// Validates the service base URL and builds the HTTP client with the
    /// configured request timeout. No network traffic happens here.
    pub fn new(config: Config) -> Result<Self> {
        let service = AnalysisService::new(&config.service)?;
        let (event_tx, _rx) = tokio::sync::broadcast::channel(config.event_buffer.max(1));

        tracing::info!(
            base_url = %config.service.base_url,
            dispatch = ?config.dispatch,
            max_batch_size = ?config.intake.max_batch_size,
            "color analyzer initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            service,
            previews: Arc::new(PreviewRegistry::new()),
            active: Arc::new(tokio::sync::Mutex::new(None)),
            next_session_id: Arc::new(AtomicU64::new(1)),
            event_tx,
        })
    }

    /// Subscribe to analyzer events
    ///
    /// Multiple subscribers are supported. Each subscriber receives all
    /// events independently; a subscriber that falls behind the buffer
    /// receives a `RecvError::Lagged`.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// The preview registry, for resolving handles when rendering
    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Emit an event to all subscribers
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// analysis proceeds whether or not anyone is listening.
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }
}
