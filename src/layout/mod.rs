//! Annotation slide layout.
//!
//! - [`geometry`]: frames for screenshots, notes and page numbers
//! - [`sequence`]: the slide list abstraction the composer edits
//! - [`composer`]: the interleaving pass itself

pub mod composer;
pub mod geometry;
pub mod sequence;

pub use composer::{Composer, CompositionReport};
pub use geometry::{
    ImageSize, LayoutConfig, Rect, SlideSize, notes_frame, page_number_frame, screenshot_frame,
};
pub use sequence::{SlideSequence, image_size};
