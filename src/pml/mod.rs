//! PresentationML document-model layer.
//!
//! This module provides the slide-deck document model built over the package
//! graph in [`crate::opc`]:
//!
//! - `Presentation`: the root object owning the part registry and deck state
//! - `Slides` / `SlideMasters`: lazily-materialized deck collections
//! - `Slide`, `SlideMaster`, `SlideLayout`: handles over individual parts
//! - `ShapeTree` / `Shape`: a part's ordered content tree
//!
//! Mutation goes through the presentation, which keeps the slide id list,
//! the relationship tables, and the content trees mutually consistent: an
//! operation either fully succeeds or leaves all three as they were.

pub mod error;
pub mod id_list;
pub mod presentation;
pub mod shapes;
pub mod slide;

/// English Metric Units: 914400 EMU = 1 inch.
pub type Emu = i64;

// Re-export main types
pub use error::{PmlError, Result};
pub use id_list::{MasterEntry, SlideEntry, SlideId, SlideIdList};
pub use presentation::{Presentation, PresentationPart, SlideSize};
pub use shapes::{Shape, ShapeTree};
pub use slide::{Slide, SlideLayout, SlideLayouts, SlideMaster, SlideMasters, Slides};
