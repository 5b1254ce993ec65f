//! Markdown subset to text box content.
//!
//! Block level: `#`, `##`, `###` headings; `- ` and `* ` bullets; `N. `
//! numbered items; blank lines. Inline: `**bold**` and `*italic*`. Markers
//! are stripped; anything unmatched stays literal.

use super::config::Typography;
use crate::ooxml::pptx::text::{RunStyle, TextBody, TextParagraph, TextRun};

/// Line kinds of the subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Heading(usize),
    Bullet,
    Numbered,
    Plain,
}

/// Render note text into a [`TextBody`], one paragraph per line.
///
/// Runs of blank lines become a single empty paragraph.
pub fn render_note(text: &str, typography: &Typography) -> TextBody {
    let mut body = TextBody::new();
    let mut previous_blank = false;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !previous_blank && !body.paragraphs().is_empty() {
                body.push_paragraph(TextParagraph::new());
            }
            previous_blank = true;
            continue;
        }
        previous_blank = false;

        let (block, content) = classify(line);
        let base = match block {
            Block::Heading(level) => RunStyle::sized(typography.heading_size(level))
                .bold(true)
                .color(typography.heading_color),
            Block::Bullet | Block::Numbered | Block::Plain => {
                RunStyle::sized(typography.body_size).color(typography.body_color)
            },
        };

        let mut paragraph = TextParagraph::new();
        push_inline(&mut paragraph, content, base);
        body.push_paragraph(paragraph);
    }

    body
}

fn classify(line: &str) -> (Block, &str) {
    for (level, marker) in [(3, "### "), (2, "## "), (1, "# ")] {
        if let Some(rest) = line.strip_prefix(marker) {
            return (Block::Heading(level), rest.trim_start());
        }
    }
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return (Block::Bullet, rest.trim_start());
    }

    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0
        && let Some(rest) = line[digits..].strip_prefix(". ")
    {
        return (Block::Numbered, rest.trim_start());
    }

    (Block::Plain, line)
}

/// Split a line into plain, bold and italic runs on top of `base`.
fn push_inline(paragraph: &mut TextParagraph, text: &str, base: RunStyle) {
    let mut plain = String::new();
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("**") {
            match after.find("**") {
                Some(end) if end > 0 => {
                    flush(paragraph, &mut plain, base);
                    paragraph.push_run(TextRun::new(&after[..end], base.bold(true)));
                    rest = &after[end + 2..];
                },
                _ => {
                    plain.push_str("**");
                    rest = after;
                },
            }
            continue;
        }

        if let Some(after) = rest.strip_prefix('*') {
            match closing_single_star(after) {
                Some(end) if end > 0 => {
                    flush(paragraph, &mut plain, base);
                    paragraph.push_run(TextRun::new(&after[..end], base.italic(true)));
                    rest = &after[end + 1..];
                },
                _ => {
                    plain.push('*');
                    rest = after;
                },
            }
            continue;
        }

        let next = memchr::memchr(b'*', rest.as_bytes()).unwrap_or(rest.len());
        plain.push_str(&rest[..next]);
        rest = &rest[next..];
    }

    flush(paragraph, &mut plain, base);
}

/// Byte offset of the next `*` that is not part of a `**` pair.
fn closing_single_star(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'*' {
            if bytes.get(i + 1) == Some(&b'*') {
                i += 2;
                continue;
            }
            return Some(i);
        }
        i += 1;
    }
    None
}

fn flush(paragraph: &mut TextParagraph, plain: &mut String, style: RunStyle) {
    if !plain.is_empty() {
        paragraph.push_run(TextRun::new(std::mem::take(plain), style));
    }
}
