//! Line scanner for `## Slide <k>` sections.

use super::{NotesMapping, ParsedNotes};
use memchr::memchr_iter;
use tracing::{debug, warn};

/// A `##` header line: its byte span and trimmed title.
#[derive(Debug)]
struct Header<'a> {
    start: usize,
    end: usize,
    title: &'a str,
}

/// Parse a Markdown notes document into one note per original slide.
///
/// A section starts after a `## Slide <k>` line (case-insensitive, k is
/// 1-based) and runs to the next `##` header of any title or the end of the
/// document. Later sections for the same slide replace earlier ones; slide
/// numbers outside `1..=slide_count` are dropped. Other `##` titles are
/// reported in [`ParsedNotes::unexpected_sections`] and logged.
pub fn parse_notes_document(text: &str, slide_count: usize) -> ParsedNotes {
    let headers = level_two_headers(text);
    let mut notes = vec![String::new(); slide_count];
    let mut unexpected_sections = Vec::new();
    let mut dropped_sections = Vec::new();

    for (i, header) in headers.iter().enumerate() {
        match slide_number(header.title) {
            Some(number) => {
                let section_end = headers.get(i + 1).map_or(text.len(), |next| next.start);
                let section = text[header.end..section_end].trim();
                match number.checked_sub(1).filter(|&index| index < slide_count) {
                    Some(index) => notes[index] = section.to_string(),
                    None => {
                        debug!(number, slide_count, "dropping notes for slide outside the deck");
                        dropped_sections.push(number);
                    },
                }
            },
            None => {
                warn!(
                    "unexpected section '## {}' found in markdown and ignored",
                    header.title
                );
                unexpected_sections.push(header.title.to_string());
            },
        }
    }

    ParsedNotes {
        mapping: NotesMapping::from_notes(notes),
        unexpected_sections,
        dropped_sections,
    }
}

/// Collect `##` headers in document order. `#` and `###` lines are not
/// section boundaries.
fn level_two_headers(text: &str) -> Vec<Header<'_>> {
    let bytes = text.as_bytes();
    let mut headers = Vec::new();
    let mut line_start = 0;

    let line_ends = memchr_iter(b'\n', bytes).chain(std::iter::once(bytes.len()));
    for newline in line_ends {
        if line_start > bytes.len() {
            break;
        }
        let line = text[line_start..newline].trim_end_matches('\r');
        if let Some(title) = header_title(line) {
            headers.push(Header {
                start: line_start,
                end: newline,
                title,
            });
        }
        line_start = newline + 1;
    }

    headers
}

/// Title of a `##` header line: `##`, at least one blank, then the title.
fn header_title(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    Some(rest.trim())
}

/// Slide number of a `Slide <digits>` title.
///
/// A number too large for `usize` still names a slide header; it maps to
/// `usize::MAX` and is dropped as out of range.
fn slide_number(title: &str) -> Option<usize> {
    let keyword = title.get(..5)?;
    if !keyword.eq_ignore_ascii_case("slide") {
        return None;
    }
    let rest = &title[5..];
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    let digits = rest.trim_start();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse::<usize>().unwrap_or(usize::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_title() {
        assert_eq!(header_title("## Slide 3"), Some("Slide 3"));
        assert_eq!(header_title("##\tNotes  "), Some("Notes"));
        assert_eq!(header_title("##Slide 3"), None);
        assert_eq!(header_title("### Slide 3"), None);
        assert_eq!(header_title("# Slide 3"), None);
        assert_eq!(header_title(" ## Slide 3"), None);
    }

    #[test]
    fn test_slide_number() {
        assert_eq!(slide_number("Slide 3"), Some(3));
        assert_eq!(slide_number("SLIDE   12"), Some(12));
        assert_eq!(slide_number("slide\t7"), Some(7));
        assert_eq!(slide_number("Slide3"), None);
        assert_eq!(slide_number("Slide 3a"), None);
        assert_eq!(slide_number("Slide"), None);
        assert_eq!(slide_number("Slides 3"), None);
        assert_eq!(slide_number("Slide 99999999999999999999999"), Some(usize::MAX));
    }

    #[test]
    fn test_section_maps_to_index() {
        let parsed = parse_notes_document("## Slide 3\nThird slide notes\n", 5);
        assert_eq!(parsed.mapping.get(2), "Third slide notes");
        assert_eq!(parsed.mapping.len(), 5);
        assert!(parsed.unexpected_sections.is_empty());
    }

    #[test]
    fn test_out_of_range_dropped() {
        let parsed = parse_notes_document("## Slide 7\nToo far\n## Slide 0\nToo low", 5);
        assert!(parsed.mapping.iter().all(str::is_empty));
        assert_eq!(parsed.dropped_sections, vec![7, 0]);
        assert!(parsed.unexpected_sections.is_empty());
    }

    #[test]
    fn test_unexpected_section_ignored() {
        let md = "## Slide 1\nFirst\n## Notes\nGeneral remarks\n## Slide 2\nSecond";
        let parsed = parse_notes_document(md, 2);
        assert_eq!(parsed.unexpected_sections, vec!["Notes".to_string()]);
        // The unexpected header still ends the previous section
        assert_eq!(parsed.mapping.get(0), "First");
        assert_eq!(parsed.mapping.get(1), "Second");
    }

    #[test]
    fn test_last_write_wins() {
        let md = "## Slide 2\nfirst version\n## Slide 2\nsecond version\n";
        let parsed = parse_notes_document(md, 3);
        assert_eq!(parsed.mapping.get(1), "second version");
    }

    #[test]
    fn test_nested_headers_stay_in_section() {
        let md = "## Slide 1\n# Big\n### Small\n- item\n\n1. first\n## slide 2\r\nWindows line\r\n";
        let parsed = parse_notes_document(md, 2);
        assert_eq!(parsed.mapping.get(0), "# Big\n### Small\n- item\n\n1. first");
        assert_eq!(parsed.mapping.get(1), "Windows line");
    }

    #[test]
    fn test_text_before_first_header_ignored() {
        let parsed = parse_notes_document("# Talk notes\nintro\n\n## Slide 1\n  Hello  \n", 1);
        assert_eq!(parsed.mapping.get(0), "Hello");
    }

    #[test]
    fn test_zero_slides() {
        let parsed = parse_notes_document("## Slide 1\nHello", 0);
        assert!(parsed.mapping.is_empty());
        assert_eq!(parsed.dropped_sections, vec![1]);
    }
}
