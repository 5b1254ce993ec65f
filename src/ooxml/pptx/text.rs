//! Text model for text boxes: a body of paragraphs, each holding styled runs.
//!
//! This mirrors the DrawingML `a:txBody` / `a:p` / `a:r` hierarchy closely
//! enough that serialization is a straight walk over the tree.

use crate::common::unit::pt_to_centipoints;
use crate::common::xml::{escape_xml, strip_invalid_xml_chars};
use crate::ooxml::error::{OoxmlError, Result};
use serde::Deserialize;
use std::fmt::{self, Write as _};
use std::str::FromStr;

/// An sRGB colour, written as `a:srgbClr val="RRGGBB"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ColorValue")]
pub struct RgbColor(pub u8, pub u8, pub u8);

/// Unquoted all-digit colours such as `505050` arrive from YAML as integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorValue {
    Text(String),
    Digits(u64),
}

impl FromStr for RgbColor {
    type Err = String;

    /// Parse `RRGGBB`, with or without a leading `#`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("invalid colour '{}', expected RRGGBB", s));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        Ok(RgbColor(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<ColorValue> for RgbColor {
    type Error = String;

    fn try_from(value: ColorValue) -> std::result::Result<Self, Self::Error> {
        match value {
            ColorValue::Text(text) => text.parse(),
            ColorValue::Digits(digits) => format!("{:06}", digits).parse(),
        }
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Character formatting of a run. `None` fields inherit from the slide's
/// text styles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunStyle {
    /// Font size in points
    pub size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<RgbColor>,
}

impl RunStyle {
    pub fn sized(size: f64) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn color(mut self, color: Option<RgbColor>) -> Self {
        self.color = color;
        self
    }
}

/// A span of text sharing one [`RunStyle`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    text: String,
    style: RunStyle,
}

impl TextRun {
    pub fn new<S: Into<String>>(text: S, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &RunStyle {
        &self.style
    }
}

/// Horizontal paragraph alignment (`a:pPr algn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    fn as_attr(&self) -> &'static str {
        match self {
            Alignment::Left => "l",
            Alignment::Center => "ctr",
            Alignment::Right => "r",
        }
    }

    fn from_attr(value: &str) -> Option<Self> {
        match value {
            "l" => Some(Alignment::Left),
            "ctr" => Some(Alignment::Center),
            "r" => Some(Alignment::Right),
            _ => None,
        }
    }
}

/// One `a:p`. An empty paragraph is a blank line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextParagraph {
    runs: Vec<TextRun>,
    alignment: Option<Alignment>,
}

impl TextParagraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Append a run. Consecutive runs with an identical style are merged,
    /// and empty text is dropped.
    pub fn push_run(&mut self, run: TextRun) {
        if run.text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.style == run.style => last.text.push_str(&run.text),
            _ => self.runs.push(run),
        }
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    pub fn alignment(&self) -> Option<Alignment> {
        self.alignment
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Content of a text box.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBody {
    paragraphs: Vec<TextParagraph>,
}

impl TextBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// A body with one paragraph holding one run.
    pub fn single_line<S: Into<String>>(
        text: S,
        style: RunStyle,
        alignment: Option<Alignment>,
    ) -> Self {
        let mut paragraph = TextParagraph::new();
        paragraph.alignment = alignment;
        paragraph.push_run(TextRun::new(text, style));
        Self {
            paragraphs: vec![paragraph],
        }
    }

    pub fn push_paragraph(&mut self, paragraph: TextParagraph) {
        self.paragraphs.push(paragraph);
    }

    pub fn paragraphs(&self) -> &[TextParagraph] {
        &self.paragraphs
    }

    /// Whether the body holds no visible text.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.iter().all(TextParagraph::is_empty)
    }

    /// Paragraph texts joined with newlines.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(TextParagraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write `<p:txBody>` for a text box.
    pub(crate) fn write_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<p:txBody>");
        xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr>"#);
        xml.push_str("<a:lstStyle/>");

        if self.paragraphs.is_empty() {
            xml.push_str("<a:p/>");
        }
        for paragraph in &self.paragraphs {
            xml.push_str("<a:p>");
            if let Some(alignment) = paragraph.alignment {
                write!(xml, r#"<a:pPr algn="{}"/>"#, alignment.as_attr())
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
            }
            for run in &paragraph.runs {
                xml.push_str("<a:r>");
                write_run_properties(xml, &run.style, "a:rPr")?;
                write!(
                    xml,
                    "<a:t>{}</a:t>",
                    escape_xml(&strip_invalid_xml_chars(&run.text))
                )
                .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                xml.push_str("</a:r>");
            }
            // Keeps blank lines at the body's font size
            if let Some(style) = paragraph.runs.last().map(|r| r.style) {
                write_run_properties(xml, &style, "a:endParaRPr")?;
            }
            xml.push_str("</a:p>");
        }

        xml.push_str("</p:txBody>");
        Ok(())
    }
}

fn write_run_properties(xml: &mut String, style: &RunStyle, tag: &str) -> Result<()> {
    write!(xml, r#"<{} lang="en-US" dirty="0""#, tag).map_err(|e| OoxmlError::Xml(e.to_string()))?;
    if let Some(size) = style.size {
        write!(xml, r#" sz="{}""#, pt_to_centipoints(size))
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    }
    if style.bold {
        xml.push_str(r#" b="1""#);
    }
    if style.italic {
        xml.push_str(r#" i="1""#);
    }

    match style.color {
        Some(color) => {
            write!(
                xml,
                r#"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></{}>"#,
                color, tag
            )
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        },
        None => xml.push_str("/>"),
    }
    Ok(())
}

/// Read run properties back from an `a:rPr` start or empty tag.
pub(crate) fn run_style_from_attrs(e: &quick_xml::events::BytesStart<'_>) -> Result<RunStyle> {
    let mut style = RunStyle::default();
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?;
        match attr.key.as_ref() {
            b"sz" => style.size = value.parse::<f64>().ok().map(|sz| sz / 100.0),
            b"b" => style.bold = value == "1" || value == "true",
            b"i" => style.italic = value == "1" || value == "true",
            _ => {},
        }
    }
    Ok(style)
}

pub(crate) fn alignment_from_attrs(e: &quick_xml::events::BytesStart<'_>) -> Result<Option<Alignment>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"algn" {
            return Ok(Alignment::from_attr(&attr.unescape_value()?));
        }
    }
    Ok(None)
}
