//! Speaker notes loaded from a Markdown file.
//!
//! The file holds one `## Slide <k>` section per slide. Parsing yields a
//! [`NotesMapping`] with exactly one entry per original slide, fixed for the
//! rest of the run.

mod parser;

pub use parser::parse_notes_document;

use crate::common::error::{Error, Result};
use std::path::Path;
use tracing::{info, warn};

/// One note per original slide, indexed by 0-based original slide index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotesMapping {
    notes: Vec<String>,
}

impl NotesMapping {
    /// A mapping with an empty note for each of `slide_count` slides.
    pub fn empty(slide_count: usize) -> Self {
        Self {
            notes: vec![String::new(); slide_count],
        }
    }

    pub(crate) fn from_notes(notes: Vec<String>) -> Self {
        Self { notes }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Note text for a slide; `""` when it has none or `index` is out of
    /// range.
    pub fn get(&self, index: usize) -> &str {
        self.notes.get(index).map_or("", String::as_str)
    }

    /// Note text for a slide, `None` when empty.
    pub fn note(&self, index: usize) -> Option<&str> {
        Some(self.get(index)).filter(|note| !note.is_empty())
    }

    /// Number of slides that have a note.
    pub fn count_non_empty(&self) -> usize {
        self.notes.iter().filter(|note| !note.is_empty()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.notes.iter().map(String::as_str)
    }
}

/// Result of parsing a notes document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNotes {
    pub mapping: NotesMapping,
    /// Titles of `##` sections that are not `Slide <k>`
    pub unexpected_sections: Vec<String>,
    /// Slide numbers of sections outside the deck
    pub dropped_sections: Vec<usize>,
}

/// Parse Markdown notes text. See [`parse_notes_document`].
pub fn parse_notes_md(text: &str, slide_count: usize) -> NotesMapping {
    parse_notes_document(text, slide_count).mapping
}

/// Read and parse a notes file.
///
/// Only Markdown is supported: a path without a `.md` extension is a
/// [`Error::Configuration`]; an unreadable file is an [`Error::Io`].
pub fn load_notes<P: AsRef<Path>>(path: P, slide_count: usize) -> Result<NotesMapping> {
    let path = path.as_ref();
    let is_markdown = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
    if !is_markdown {
        return Err(Error::Configuration(format!(
            "only Markdown (.md) notes are supported, got {}",
            path.display()
        )));
    }

    let text = std::fs::read_to_string(path)?;
    let mapping = parse_notes_md(&text, slide_count);
    info!(
        path = %path.display(),
        notes = mapping.count_non_empty(),
        slides = slide_count,
        "loaded speaker notes"
    );
    Ok(mapping)
}

/// Load notes if a path is given, degrading to an empty mapping when the
/// file is missing, unreadable, or not Markdown.
pub fn load_notes_or_empty(path: Option<&Path>, slide_count: usize) -> NotesMapping {
    let Some(path) = path else {
        return NotesMapping::empty(slide_count);
    };
    match load_notes(path, slide_count) {
        Ok(mapping) => mapping,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "continuing without notes");
            NotesMapping::empty(slide_count)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mapping_accessors() {
        let mapping = parse_notes_md("## Slide 2\nSecond", 3);
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.get(0), "");
        assert_eq!(mapping.note(0), None);
        assert_eq!(mapping.note(1), Some("Second"));
        assert_eq!(mapping.get(10), "");
        assert_eq!(mapping.count_non_empty(), 1);
    }

    #[test]
    fn test_parse_is_pure() {
        let md = "## Slide 1\nA\n## Other\n## Slide 2\nB";
        assert_eq!(parse_notes_document(md, 2), parse_notes_document(md, 2));
    }

    #[test]
    fn test_load_notes_requires_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "## Slide 1\nHello").unwrap();
        assert!(matches!(load_notes(&path, 1), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_load_notes_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.md");
        assert!(matches!(load_notes(&path, 1), Err(Error::Io(_))));

        let mapping = load_notes_or_empty(Some(&path), 4);
        assert_eq!(mapping, NotesMapping::empty(4));
    }

    #[test]
    fn test_load_notes_from_file() {
        let mut file = tempfile::Builder::new().suffix(".MD").tempfile().unwrap();
        writeln!(file, "## Slide 1\nHello\n## Slide 2\n**Bold** text").unwrap();

        let mapping = load_notes(file.path(), 3).unwrap();
        assert_eq!(mapping.get(0), "Hello");
        assert_eq!(mapping.get(1), "**Bold** text");
        assert_eq!(load_notes_or_empty(None, 3), NotesMapping::empty(3));
    }
}
