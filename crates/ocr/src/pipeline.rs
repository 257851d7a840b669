use kaikei_core::ReceiptInfo;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::catalog::MerchantCatalog;
use crate::config::ExtractorConfig;
use crate::extract::{ExtractError, Extractor};
use crate::recognizer::{RecognitionError, TextRecognizer};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OCR recognition failed: {0}")]
    Recognition(#[from] RecognitionError),
    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),
}

/// The result of a single receipt processing run.
#[derive(Debug, Clone)]
pub struct ReceiptRecord {
    /// Image the receipt was read from, when it came from disk.
    pub source: Option<PathBuf>,
    /// Number of OCR fragments, full-text fragment included.
    pub fragment_count: usize,
    pub info: ReceiptInfo,
}

/// Orchestrates: read image → OCR → extract.
///
/// Recognition failures are returned as-is; nothing is retried here.
pub struct ReceiptPipeline<R: TextRecognizer> {
    recognizer: R,
    catalog: MerchantCatalog,
    extractor: Extractor,
}

impl<R: TextRecognizer> ReceiptPipeline<R> {
    pub fn new(recognizer: R, catalog: MerchantCatalog, config: ExtractorConfig) -> Self {
        Self { recognizer, catalog, extractor: Extractor::new(config) }
    }

    pub fn catalog(&self) -> &MerchantCatalog {
        &self.catalog
    }

    /// Process an image on disk.
    pub async fn process_file(&self, path: &Path) -> Result<ReceiptRecord, PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        let mut record = self.process_bytes(&bytes).await?;
        record.source = Some(path.to_path_buf());
        info!(path = %path.display(), total = record.info.total, "receipt processed");
        Ok(record)
    }

    /// Process raw image bytes (from camera capture or file read).
    pub async fn process_bytes(&self, data: &[u8]) -> Result<ReceiptRecord, PipelineError> {
        let tokens = self.recognizer.annotate(data).await?;
        let info = self.extractor.aggregate(&tokens, &self.catalog)?;

        Ok(ReceiptRecord { source: None, fragment_count: tokens.len(), info })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::MockRecognizer;
    use kaikei_core::{Tag, TextFragment, TokenSequence};

    fn hotto_motto() -> TokenSequence {
        TokenSequence::new(vec![
            TextFragment::new("Hotto Motto\n23年11月2\nのり弁当\n合計 1,180", 0, 0),
            TextFragment::new("Hotto", 40, 60),
            TextFragment::new("23年11月2", 40, 120),
            TextFragment::new("のり弁当", 40, 300),
            TextFragment::new("合計", 40, 500),
            TextFragment::new("1,180", 400, 503),
        ])
    }

    fn pipeline(recognizer: MockRecognizer) -> ReceiptPipeline<MockRecognizer> {
        ReceiptPipeline::new(recognizer, MerchantCatalog::builtin(), ExtractorConfig::default())
    }

    #[tokio::test]
    async fn process_bytes_extracts_receipt() {
        let record = pipeline(MockRecognizer::new(hotto_motto()))
            .process_bytes(b"jpeg")
            .await
            .unwrap();
        assert_eq!(record.source, None);
        assert_eq!(record.fragment_count, 6);
        assert_eq!(record.info.name, "Hotto Motto");
        assert_eq!(record.info.date, "2023-11-2");
        assert_eq!(record.info.tags, vec![Tag::Bento]);
        assert_eq!(record.info.total, 1180);
    }

    #[tokio::test]
    async fn process_file_records_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.jpg");
        std::fs::write(&path, b"not really a jpeg").unwrap();

        let record = pipeline(MockRecognizer::new(hotto_motto()))
            .process_file(&path)
            .await
            .unwrap();
        assert_eq!(record.source.as_deref(), Some(path.as_path()));
        assert_eq!(record.info.total, 1180);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = pipeline(MockRecognizer::new(hotto_motto()))
            .process_file(&dir.path().join("missing.jpg"))
            .await;
        assert!(matches!(result, Err(PipelineError::Io(_))));
    }

    #[tokio::test]
    async fn recognition_error_surfaces() {
        let result = pipeline(MockRecognizer::failing("quota exceeded"))
            .process_bytes(b"jpeg")
            .await;
        assert!(matches!(
            result,
            Err(PipelineError::Recognition(RecognitionError::Service { .. }))
        ));
    }

    #[tokio::test]
    async fn strict_dates_abort_processing() {
        let tokens = TokenSequence::new(vec![TextFragment::new("2023/2/30", 0, 0)]);
        let pipeline = ReceiptPipeline::new(
            MockRecognizer::new(tokens),
            MerchantCatalog::builtin(),
            ExtractorConfig { strict_dates: true, ..ExtractorConfig::default() },
        );
        assert!(matches!(
            pipeline.process_bytes(b"jpeg").await,
            Err(PipelineError::Extract(_))
        ));
    }
}
