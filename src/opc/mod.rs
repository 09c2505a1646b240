/// Package-graph layer for presentation documents.
///
/// This module implements the part-and-relationship model defined by the Open
/// Packaging Conventions as an in-memory graph: a flat registry of parts, a
/// relationship table per part, and typed edges that are either internal
/// (owning a target part) or external (pointing outside the package).
///
/// Byte-level reading and writing of the physical package is not handled here;
/// a container collaborator materializes the graph and receives it back for
/// serialization.

pub mod constants;
pub mod error;
pub mod packuri;
pub mod registry;
pub mod rel;

// Re-export commonly used types
pub use packuri::PackURI;
pub use registry::{Part, PartKind, PartRef, PartRegistry};
pub use rel::{RelTarget, Relationship, Relationships};
