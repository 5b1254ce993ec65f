//! deckscribe - annotate PowerPoint decks with screenshots and speaker notes
//!
//! After every original slide of a `.pptx` deck, deckscribe inserts a new
//! slide holding a screenshot of the original and, when a Markdown notes
//! file has a `## Slide N` section for it, the rendered notes. Original
//! slides are stamped with running page numbers.
//!
//! # Features
//!
//! - **Deck editing**: slide insertion, pictures and text boxes written
//!   straight into the OOXML package
//! - **Notes mapping**: `## Slide N` sections of a Markdown file mapped to
//!   slides, with a small Markdown subset rendered to formatted text
//! - **Adaptive layout**: screenshot and notes frames derived from the slide
//!   size and image aspect ratio
//! - **Screenshots**: LibreOffice + poppler rendering cached by content hash,
//!   with generated placeholders when the tools are missing
//! - **PDF export** of the finished deck
//!
//! # Example
//!
//! ```no_run
//! use deckscribe::layout::{Composer, LayoutConfig};
//! use deckscribe::markdown::Typography;
//! use deckscribe::notes::load_notes;
//! use deckscribe::ooxml::pptx::Deck;
//! use deckscribe::render::{NoRenderer, PlaceholderFactory, RenderCapability};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut deck = Deck::open("talk.pptx")?;
//! let notes = load_notes("talk_notes.md", deck.slide_count())?;
//!
//! let mut placeholders = PlaceholderFactory::new("data_out/.placeholders");
//! let mut screenshots = NoRenderer::new("no renderer");
//! let composer = Composer::new(
//!     LayoutConfig::default(),
//!     Typography::default(),
//!     RenderCapability::Unavailable { reason: "no renderer".into() },
//! );
//! let report = composer.compose(&mut deck, &notes, &mut screenshots, &mut placeholders)?;
//! println!("inserted {} slides", report.inserted);
//!
//! deck.save("talk_annotated.pptx")?;
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod config;
pub mod export;
pub mod layout;
pub mod markdown;
pub mod notes;
pub mod ooxml;
pub mod render;

pub use common::{Error, Result};
pub use config::Config;
