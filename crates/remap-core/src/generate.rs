use thiserror::Error;

use crate::segment::SegmentTable;

/// Output of a generator run: the derived document text plus the segment
/// table relating it to the source it was derived from.
#[derive(Debug)]
pub struct GeneratedContent {
    pub text: String,
    pub segments: SegmentTable,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("line {line}: tabs are not allowed in indentation")]
    TabIndentation { line: usize },

    #[error("line {line}: `{found}` is not a valid element name")]
    InvalidElementName { line: usize, found: String },

    #[error("{0}")]
    Other(String),
}

/// Format-specific derivation strategy: turns an authored source text into
/// an analyzer-friendly generated text and the correspondence table between
/// the two. One implementation per supported source format; owners hold it
/// as `Box<dyn Generator>`.
pub trait Generator: Send + Sync {
    fn generate(&self, source: &str) -> Result<GeneratedContent, GenerateError>;
}
