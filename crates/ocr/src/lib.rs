pub mod catalog;
pub mod config;
pub mod date;
pub mod extract;
pub mod pipeline;
pub mod recognizer;
pub mod row;
pub mod value;
pub mod vision;

pub use catalog::{CatalogError, CatalogMatch, MerchantCatalog, MerchantEntry};
pub use config::{ConfigError, ExtractorConfig};
pub use date::{format_receipt_date, DateGrammar, DateParseError, DateParser};
pub use extract::{ExtractError, Extractor};
pub use pipeline::{PipelineError, ReceiptPipeline, ReceiptRecord};
pub use recognizer::{MockRecognizer, RecognitionError, TextRecognizer};
pub use row::RowFinder;
pub use value::extract_integer;
pub use vision::VisionRecognizer;
