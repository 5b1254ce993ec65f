//! Parts for PowerPoint presentation documents.
//!
//! Thin views over the XML of the parts the deck editor reads or rewrites.
pub mod presentation;
pub mod slide;

pub use presentation::{PresentationPart, SlideIdEntry};
pub use slide::{ShapeSummary, SlideLayoutPart, SlidePart};
