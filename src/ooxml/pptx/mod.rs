//! PowerPoint (.pptx) deck editing.
//!
//! Opens a presentation package, inserts slides, and adds pictures and text
//! boxes to slide shape trees. Untouched parts are written back verbatim.

pub mod deck;
pub mod format;
pub mod parts;
pub mod shape;
pub mod text;

pub use deck::Deck;
pub use format::ImageFormat;
pub use parts::ShapeSummary;
pub use text::{Alignment, RgbColor, RunStyle, TextBody, TextParagraph, TextRun};
