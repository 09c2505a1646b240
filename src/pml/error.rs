/// Error types for presentation document-model operations.
use crate::pml::id_list::SlideId;
use thiserror::Error;

/// Result type for presentation document-model operations.
pub type Result<T> = std::result::Result<T, PmlError>;

/// Error types for presentation document-model operations.
#[derive(Error, Debug)]
pub enum PmlError {
    /// Package-graph error
    #[error("OPC error: {0}")]
    Opc(#[from] crate::opc::error::OpcError),

    /// Index outside the valid range of a collection
    #[error("Index {index} out of range for collection of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Slide id already present in the slide id list
    #[error("Duplicate slide id: {0}")]
    DuplicateSlideId(SlideId),

    /// Layout not referenced by any slide master
    #[error("Invalid layout binding: {0}")]
    InvalidLayoutBinding(String),
}
