use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference corner of a fragment's bounding box, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

impl Vertex {
    pub fn new(x: i32, y: i32) -> Self {
        Vertex { x, y }
    }
}

/// A single OCR-recognized unit of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFragment {
    pub description: String,
    pub anchor: Vertex,
}

impl TextFragment {
    pub fn new(description: impl Into<String>, x: i32, y: i32) -> Self {
        TextFragment { description: description.into(), anchor: Vertex::new(x, y) }
    }
}

/// Axis used to decide whether two fragments sit on the same row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    /// The coordinate this orientation compares on: `y` for vertical rows, `x` for horizontal.
    pub fn coordinate(self, vertex: Vertex) -> i32 {
        match self {
            Orientation::Vertical => vertex.y,
            Orientation::Horizontal => vertex.x,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Vertical => write!(f, "vertical"),
            Orientation::Horizontal => write!(f, "horizontal"),
        }
    }
}

/// Ordered OCR output for one receipt.
///
/// Fragment 0 carries the full recognized text (lines joined by `\n`) and spans the
/// whole image; every later fragment is a single word or line with a tight box.
/// The sequence is read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSequence(Vec<TextFragment>);

impl TokenSequence {
    pub fn new(fragments: Vec<TextFragment>) -> Self {
        TokenSequence(fragments)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TextFragment> {
        self.0.get(index)
    }

    /// Full receipt text from fragment 0, or `None` when recognition found nothing.
    pub fn full_text(&self) -> Option<&str> {
        self.0.first().map(|f| f.description.as_str())
    }

    /// Individual word/line fragments (everything after fragment 0).
    pub fn words(&self) -> &[TextFragment] {
        self.0.get(1..).unwrap_or(&[])
    }
}

impl From<Vec<TextFragment>> for TokenSequence {
    fn from(fragments: Vec<TextFragment>) -> Self {
        TokenSequence::new(fragments)
    }
}
