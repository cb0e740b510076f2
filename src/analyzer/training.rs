//! Training workflow and cache control.

use super::ColorAnalyzer;
use crate::error::{Error, Result};
use crate::intake::SelectedFile;
use crate::types::Event;

impl ColorAnalyzer {
    /// Submit the active session's images as training samples for a color.
    ///
    /// Uses every item in the session regardless of analysis status — the
    /// training contract cares about payloads, not per-item results.
    /// Returns the service's acknowledgement message.
    pub async fn train(&self, color_name: &str) -> Result<String> {
        let files: Vec<SelectedFile> = {
            let active = self.active.lock().await;
            let session = active.as_ref().ok_or(Error::NoSession)?;
            session
                .items()
                .iter()
                .map(|item| SelectedFile {
                    name: item.name.clone(),
                    mime: item.mime.clone(),
                    payload: item.payload.clone(),
                })
                .collect()
        };

        let refs: Vec<&SelectedFile> = files.iter().collect();
        let message = self.service.train(&refs, color_name).await?;

        tracing::info!(color_name, images = refs.len(), "training batch accepted");
        self.emit_event(Event::TrainingComplete {
            color_name: color_name.to_string(),
            message: message.clone(),
        });

        Ok(message)
    }

    /// Fetch the list of colors the service has been trained on.
    pub async fn trained_colors(&self) -> Result<Vec<crate::types::TrainedColor>> {
        self.service.trained_colors().await
    }

    /// Clear the server-side result cache and reset the local session.
    ///
    /// The local reset mirrors the server state change: cached provenance
    /// badges shown for the old session would be stale once the server
    /// cache is gone.
    pub async fn clear_cache(&self) -> Result<()> {
        self.service.clear_cache().await?;
        self.clear().await;
        self.emit_event(Event::CacheCleared);
        Ok(())
    }
}
