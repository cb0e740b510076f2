//! Remote analysis service client
//!
//! Speaks the HTTP contract of the color analysis service:
//! - `POST /analyze` — multipart form with one or more `images` parts;
//!   2xx responses carry one result entry per submitted image, in
//!   submission order, either as a bare array or under a `results` /
//!   `analysis_results` wrapper. An entry may carry an embedded `error`
//!   instead of a report (per-item failure inside a successful response).
//! - `POST /train` — `images` parts plus a `color_name` field.
//! - `GET /trained-colors` — the service's trained color list.
//! - `POST /clear-cache` — drops server-side cached results.
//!
//! Non-2xx responses carry a JSON `{detail}` string which is surfaced
//! verbatim; an unparseable body falls back to a generic message.

use serde::Deserialize;

use crate::config::ServiceConfig;
use crate::error::{Error, Result, GENERIC_ERROR_MESSAGE};
use crate::intake::SelectedFile;
use crate::types::{AnalysisReport, TrainedColor};

/// Per-image outcome inside a successful analyze response:
/// a report, or the service's embedded per-item error message.
pub type EntryOutcome = std::result::Result<AnalysisReport, String>;

/// HTTP client for the remote analysis service
#[derive(Clone, Debug)]
pub struct AnalysisService {
    client: reqwest::Client,
    base: String,
}

/// One entry of an analyze response: a report, an embedded error, or both
/// slots empty (a contract violation mapped to the generic message).
#[derive(Debug, Deserialize)]
struct AnalysisEntry {
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    report: Option<AnalysisReport>,
}

/// Accepts both response shapes observed in the wild: a wrapper object
/// (`results` or `analysis_results`) or a bare top-level array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnalyzeBody {
    Wrapped {
        #[serde(alias = "analysis_results")]
        results: Vec<AnalysisEntry>,
    },
    Bare(Vec<AnalysisEntry>),
}

impl AnalyzeBody {
    fn into_entries(self) -> Vec<AnalysisEntry> {
        match self {
            AnalyzeBody::Wrapped { results } => results,
            AnalyzeBody::Bare(entries) => entries,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DetailBody {
    detail: String,
}

#[derive(Debug, Deserialize)]
struct TrainBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct TrainedColorsBody {
    trained_colors: Vec<TrainedColor>,
}

impl AnalysisService {
    /// Build a client for the configured service.
    ///
    /// Validates the base URL and applies the request timeout to every
    /// request issued through this client.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let parsed = url::Url::parse(&config.base_url)
            .map_err(|e| Error::config("service.base_url", e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::config(
                "service.base_url",
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    fn images_form(files: &[&SelectedFile]) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for file in files {
            let part = reqwest::multipart::Part::stream(file.payload.clone())
                .file_name(file.name.clone())
                .mime_str(&file.mime)?;
            form = form.part("images", part);
        }
        Ok(form)
    }

    /// Extract the service's `detail` message from a failed response.
    async fn failure(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let message = match response.text().await {
            Ok(body) => serde_json::from_str::<DetailBody>(&body)
                .map(|b| b.detail)
                .unwrap_or_else(|_| GENERIC_ERROR_MESSAGE.to_string()),
            Err(_) => GENERIC_ERROR_MESSAGE.to_string(),
        };
        Error::Service {
            message,
            status: Some(status),
        }
    }

    /// Submit one or more images for analysis.
    ///
    /// On a 2xx response, returns one [`EntryOutcome`] per submitted image
    /// in submission order. Request-level failures (non-2xx, network,
    /// timeout) return `Err` and leave per-item mapping to the caller.
    pub async fn analyze(&self, files: &[&SelectedFile]) -> Result<Vec<EntryOutcome>> {
        let form = Self::images_form(files)?;
        tracing::debug!(images = files.len(), "submitting analyze request");

        let response = self
            .client
            .post(self.endpoint("analyze"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }

        let body: AnalyzeBody = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(format!("analyze response: {e}")))?;
        let entries = body.into_entries();

        if entries.len() != files.len() {
            return Err(Error::InvalidResponse(format!(
                "expected {} results, got {}",
                files.len(),
                entries.len()
            )));
        }

        Ok(entries
            .into_iter()
            .map(|entry| match (entry.report, entry.error) {
                (_, Some(error)) => Err(error),
                (Some(report), None) => Ok(report),
                (None, None) => Err(GENERIC_ERROR_MESSAGE.to_string()),
            })
            .collect())
    }

    /// Submit a labelled batch of images to train the service on a color.
    ///
    /// Returns the service's acknowledgement message.
    pub async fn train(&self, files: &[&SelectedFile], color_name: &str) -> Result<String> {
        let form = Self::images_form(files)?.text("color_name", color_name.to_string());
        tracing::debug!(images = files.len(), color_name, "submitting train request");

        let response = self
            .client
            .post(self.endpoint("train"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }

        let body: TrainBody = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(format!("train response: {e}")))?;
        Ok(body.message)
    }

    /// Fetch the list of colors the service has been trained on.
    pub async fn trained_colors(&self) -> Result<Vec<TrainedColor>> {
        let response = self.client.get(self.endpoint("trained-colors")).send().await?;

        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }

        let body: TrainedColorsBody = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(format!("trained-colors response: {e}")))?;
        Ok(body.trained_colors)
    }

    /// Ask the service to drop its cached results.
    pub async fn clear_cache(&self) -> Result<()> {
        let response = self.client.post(self.endpoint("clear-cache")).send().await?;

        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }
        Ok(())
    }
}
