//! Tests for the analyzer core, organized by domain.

mod training;

use serde_json::{json, Value};
use wiremock::MockServer;

use crate::config::{Config, DispatchPolicy, IntakeConfig, ServiceConfig};
use crate::intake::SelectedFile;
use crate::ColorAnalyzer;

/// Build a config pointed at a mock server, with an unbounded batch so
/// individual tests control sizing explicitly.
pub(crate) fn test_config(server: &MockServer, dispatch: DispatchPolicy) -> Config {
    Config {
        service: ServiceConfig {
            base_url: server.uri(),
            ..Default::default()
        },
        intake: IntakeConfig {
            max_batch_size: None,
        },
        dispatch,
        ..Default::default()
    }
}

/// Analyzer wired to a mock server with the given dispatch policy.
pub(crate) fn test_analyzer(server: &MockServer, dispatch: DispatchPolicy) -> ColorAnalyzer {
    ColorAnalyzer::new(test_config(server, dispatch)).unwrap()
}

/// A minimal valid image selection.
pub(crate) fn image(name: &str) -> SelectedFile {
    SelectedFile::new(name, "image/png", vec![0x89, 0x50, 0x4E, 0x47])
}

/// A successful analyze entry naming its match after `color` so tests can
/// tell results apart.
pub(crate) fn entry(color: &str) -> Value {
    json!({
        "dominant_colors": [{"hex": "#8b4513", "percentage": 62.0},
                            {"hex": "#a0522d", "percentage": 38.0}],
        "closest_match": {"name": color, "similarity": 91.5, "distance": 4.2},
        "from_cache": false
    })
}

/// A wrapped analyze response carrying the given entries.
pub(crate) fn results_body(entries: Vec<Value>) -> Value {
    json!({ "results": entries })
}
