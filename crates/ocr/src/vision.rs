//! Google Cloud Vision `TEXT_DETECTION` backend over the REST API.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use kaikei_core::{TextFragment, TokenSequence, Vertex};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::recognizer::{RecognitionError, TextRecognizer};

pub const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";
pub const API_KEY_ENV: &str = "GOOGLE_VISION_API_KEY";
const API_KEY_HEADER: &str = "x-goog-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct VisionRecognizer {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl VisionRecognizer {
    pub fn new(api_key: impl Into<String>) -> Result<Self, RecognitionError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, api_key: api_key.into(), endpoint: DEFAULT_ENDPOINT.to_string() })
    }

    /// Reads the API key from `GOOGLE_VISION_API_KEY`.
    pub fn from_env() -> Result<Self, RecognitionError> {
        let key = std::env::var(API_KEY_ENV)
            .map_err(|_| RecognitionError::NotConfigured(format!("{API_KEY_ENV} is not set")))?;
        Self::new(key)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl TextRecognizer for VisionRecognizer {
    async fn annotate(&self, image_bytes: &[u8]) -> Result<TokenSequence, RecognitionError> {
        let request = BatchRequest {
            requests: vec![ImageRequest {
                image: Image { content: general_purpose::STANDARD.encode(image_bytes) },
                features: vec![Feature { kind: "TEXT_DETECTION" }],
            }],
        };

        // The key travels in a header and errors are stripped of their URL.
        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RecognitionError::Transport(e.without_url()))?;
        let status = response.status();
        debug!(%status, bytes = image_bytes.len(), "vision annotate response");

        let batch: BatchResponse = response.json().await.map_err(|e| {
            RecognitionError::Response(format!("HTTP {status}: {}", e.without_url()))
        })?;
        tokens_from_response(batch)
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct BatchRequest {
    requests: Vec<ImageRequest>,
}

#[derive(Debug, Serialize)]
struct ImageRequest {
    image: Image,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct Image {
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
    error: Option<Status>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    error: Option<Status>,
}

#[derive(Debug, Default, Deserialize)]
struct Status {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
    #[serde(default)]
    bounding_poly: BoundingPoly,
}

#[derive(Debug, Default, Deserialize)]
struct BoundingPoly {
    #[serde(default)]
    vertices: Vec<Vertex>,
}

/// First vertex of each annotation becomes the fragment anchor; absent
/// coordinates read as 0.
fn tokens_from_response(batch: BatchResponse) -> Result<TokenSequence, RecognitionError> {
    if let Some(status) = batch.error.filter(|s| !s.message.is_empty()) {
        return Err(RecognitionError::Service { message: status.message });
    }
    let response = batch
        .responses
        .into_iter()
        .next()
        .ok_or_else(|| RecognitionError::Response("no image responses".into()))?;
    if let Some(status) = response.error.filter(|s| !s.message.is_empty()) {
        return Err(RecognitionError::Service { message: status.message });
    }

    Ok(response
        .text_annotations
        .into_iter()
        .map(|a| TextFragment {
            description: a.description,
            anchor: a.bounding_poly.vertices.first().copied().unwrap_or_default(),
        })
        .collect::<Vec<_>>()
        .into())
}
