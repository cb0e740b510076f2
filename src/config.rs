//! Configuration types for color-analyzer

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Remote service connection settings
///
/// Groups settings for reaching the color analysis service.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the analysis service (default: "http://localhost:8000")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout; expiry is treated as a transport failure for
    /// the affected item(s) (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// File intake settings
///
/// Controls which raw selections become session items.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Maximum number of files accepted into one session
    /// (None = unbounded, only MIME filtering applies; default: Some(3))
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: Option<usize>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_batch_size: default_max_batch_size(),
        }
    }
}

/// Strategy used to submit a session's items to the service
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// One request per item, issued strictly in session order, one at a
    /// time; a failure on one item does not prevent dispatch of the next
    #[default]
    SequentialPerItem,
    /// A single multipart request carrying every item's payload; the
    /// response maps back one result per item in submission order
    BatchedSingleRequest,
}

/// When items are marked `Loading` during a sequential dispatch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingMark {
    /// Mark every pending item `Loading` before the first request, so
    /// observers see the whole batch spinning immediately
    #[default]
    UpFront,
    /// Mark each item `Loading` right before its own request is issued
    PerItem,
}

/// Main configuration for [`ColorAnalyzer`](crate::ColorAnalyzer)
///
/// Fields are organized into logical sub-configs:
/// - [`service`](ServiceConfig) — service URL and timeout
/// - [`intake`](IntakeConfig) — batch size limit
///
/// Dispatch behavior settings sit at the top level since they shape the
/// orchestrator rather than any one collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Remote service connection settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// File intake settings
    #[serde(default)]
    pub intake: IntakeConfig,

    /// How a session's items are submitted to the service
    #[serde(default)]
    pub dispatch: DispatchPolicy,

    /// When sequential dispatch marks items as loading
    #[serde(default)]
    pub loading_mark: LoadingMark,

    /// Event broadcast buffer size (default: 256)
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            intake: IntakeConfig::default(),
            dispatch: DispatchPolicy::default(),
            loading_mark: LoadingMark::default(),
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_batch_size() -> Option<usize> {
    Some(3)
}

fn default_event_buffer() -> usize {
    256
}

/// Serialize Duration as seconds for human-editable config files
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = Config::default();
        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.service.request_timeout, Duration::from_secs(30));
        assert_eq!(config.intake.max_batch_size, Some(3));
        assert_eq!(config.dispatch, DispatchPolicy::SequentialPerItem);
        assert_eq!(config.loading_mark, LoadingMark::UpFront);
        assert_eq!(config.event_buffer, 256);
    }

    #[test]
    fn empty_json_deserializes_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.intake.max_batch_size, Some(3));
        assert_eq!(config.dispatch, DispatchPolicy::SequentialPerItem);
    }

    #[test]
    fn dispatch_policy_deserializes_from_snake_case() {
        let config: Config =
            serde_json::from_str(r#"{"dispatch": "batched_single_request"}"#).unwrap();
        assert_eq!(config.dispatch, DispatchPolicy::BatchedSingleRequest);
    }

    #[test]
    fn unbounded_batch_size_deserializes_from_null() {
        let config: Config = serde_json::from_str(r#"{"intake": {"max_batch_size": null}}"#)
            .unwrap();
        assert_eq!(
            config.intake.max_batch_size, None,
            "explicit null must mean unbounded, not the default of 3"
        );
    }

    #[test]
    fn request_timeout_round_trips_as_seconds() {
        let config = Config {
            service: ServiceConfig {
                request_timeout: Duration::from_secs(7),
                ..Default::default()
            },
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.service.request_timeout, Duration::from_secs(7));
    }

    #[test]
    fn loading_mark_deserializes_per_item() {
        let config: Config = serde_json::from_str(r#"{"loading_mark": "per_item"}"#).unwrap();
        assert_eq!(config.loading_mark, LoadingMark::PerItem);
    }
}
