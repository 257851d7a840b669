use async_trait::async_trait;
use kaikei_core::TokenSequence;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecognitionError {
    /// The OCR service answered with an error of its own.
    #[error("{message}\nFor more info on error messages, check: https://cloud.google.com/apis/design/errors")]
    Service { message: String },
    #[error("OCR request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected OCR response: {0}")]
    Response(String),
    #[error("OCR backend not configured: {0}")]
    NotConfigured(String),
}

/// Abstraction over an OCR backend.
/// Implementations accept raw PNG/JPEG image bytes and return the annotated text
/// fragments, full text first.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn annotate(&self, image_bytes: &[u8]) -> Result<TokenSequence, RecognitionError>;
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a preset annotation, or a preset service error, regardless of the image.
pub struct MockRecognizer {
    outcome: Result<TokenSequence, String>,
}

impl MockRecognizer {
    pub fn new(tokens: TokenSequence) -> Self {
        Self { outcome: Ok(tokens) }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self { outcome: Err(message.into()) }
    }
}

#[async_trait]
impl TextRecognizer for MockRecognizer {
    async fn annotate(&self, _image_bytes: &[u8]) -> Result<TokenSequence, RecognitionError> {
        match &self.outcome {
            Ok(tokens) => Ok(tokens.clone()),
            Err(message) => Err(RecognitionError::Service { message: message.clone() }),
        }
    }
}
