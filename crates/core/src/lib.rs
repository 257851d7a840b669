pub mod fragment;
pub mod receipt;

pub use fragment::{Orientation, TextFragment, TokenSequence, Vertex};
pub use receipt::{ReceiptInfo, Tag};
