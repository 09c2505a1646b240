/// Error types for package-graph operations
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpcError {
    #[error("Unknown relationship: {0}")]
    UnknownRelationship(String),

    #[error("Unresolved relationship: {0}")]
    UnresolvedRelationship(String),

    #[error("Invalid relationship: {0}")]
    InvalidRelationship(String),

    #[error("Part not found: {0}")]
    PartNotFound(String),

    #[error("Invalid part name: {0}")]
    InvalidPartName(String),
}

pub type Result<T> = std::result::Result<T, OpcError>;
