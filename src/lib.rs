//! Longan - an in-memory document model for PresentationML slide decks
//!
//! This library provides the slide-collection and relationship-consistency
//! core of a presentation document model: slide identity and ordering,
//! relationship-consistent slide copying, and slide repositioning over an
//! in-memory part graph.
//!
//! # Features
//!
//! - **Part graph**: flat registry of parts linked by typed relationship
//!   edges, internal (owning) or external (hyperlinks and the like)
//! - **Slide ordering**: an authoritative slide id list with validated
//!   insert, remove, and move operations
//! - **Slide copy**: deep content-tree cloning with selective relationship
//!   re-linking - externals deduplicated, internal targets freshly cloned
//! - **Lazy collections**: deck collections built on first access and cached
//!   for the presentation's lifetime
//!
//! Reading and writing the physical package (the zip container and the XML
//! inside it) is out of scope; a container collaborator materializes the
//! graph with `Presentation::from_package` and takes it back with
//! `Presentation::into_package`.
//!
//! # Example - Building a deck
//!
//! ```
//! use longan::Presentation;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pres = Presentation::new();
//!
//! // Add two slides bound to the default layout
//! let layout = pres.slide_layouts()?.get(0).expect("default layout");
//! pres.add_slide(layout)?;
//! pres.add_slide(layout)?;
//!
//! // Duplicate the first slide into position 1
//! pres.copy_slide(0, 1)?;
//! assert_eq!(pres.slide_count(), 3);
//!
//! // Reorder: move the last slide to the front
//! pres.move_slide(0, 2)?;
//! # Ok(())
//! # }
//! ```

/// Package-graph layer: parts, relationships, and the part registry
pub mod opc;

/// PresentationML document-model layer: slides, masters, and the deck API
pub mod pml;

// Re-export commonly used types for convenience
pub use pml::{
    Presentation, PresentationPart, Shape, ShapeTree, Slide, SlideLayout, SlideMaster, SlideSize,
    Slides,
};
