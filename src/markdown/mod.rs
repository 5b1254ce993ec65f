//! Rendering of note text written in a small Markdown subset.
//!
//! Notes are not converted to a document; each line becomes a paragraph of
//! styled runs ready to be placed in a slide text box.

pub mod config;
pub mod render;

pub use config::Typography;
pub use render::render_note;
