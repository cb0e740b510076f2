//! # color-analyzer
//!
//! Library-first client for batched image color analysis services.
//!
//! ## Design Philosophy
//!
//! color-analyzer is designed to be:
//! - **Highly configurable** - Dispatch strategy, batch limits, and timeouts are all settings
//! - **Sensible defaults** - Works out of the box with just a service URL
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! The crate takes a raw file selection, filters it into an ordered batch,
//! attaches revocable preview handles, submits the batch to a remote color
//! analysis service (one request per image or one batched request), and
//! exposes a stable, order-preserving projection of per-item results.
//!
//! ## Quick Start
//!
//! ```no_run
//! use color_analyzer::{ColorAnalyzer, Config, SelectedFile, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         service: ServiceConfig {
//!             base_url: "https://color-service.example.com".to_string(),
//!             ..Default::default()
//!         },
//!         ..Default::default()
//!     };
//!
//!     let analyzer = ColorAnalyzer::new(config)?;
//!
//!     // Subscribe to events
//!     let mut events = analyzer.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let files = vec![SelectedFile::new("cat.jpg", "image/jpeg", vec![0xFF, 0xD8])];
//!     analyzer.select_files(files).await?;
//!     analyzer.analyze().await?;
//!
//!     for view in analyzer.project().await {
//!         println!("{}: {:?}", view.name, view.status);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Core analyzer implementation (decomposed into focused submodules)
pub mod analyzer;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// File selection intake
pub mod intake;
/// Preview handle registry
pub mod preview;
/// Batch session state
pub mod session;
/// Remote analysis service client
pub mod service;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use analyzer::ColorAnalyzer;
pub use config::{Config, DispatchPolicy, IntakeConfig, LoadingMark, ServiceConfig};
pub use error::{Error, Result};
pub use intake::{IntakeOutcome, SelectedFile};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use session::{BatchSession, SessionItem};
pub use types::{
    AnalysisReport, ClosestMatch, ColorShare, Event, ItemStatus, ItemView, SelectionSummary,
    SessionId, TrainedColor,
};
