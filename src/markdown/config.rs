//! Font sizes and colours for note text and page numbers.

use crate::ooxml::pptx::text::RgbColor;
use serde::Deserialize;

/// Typography for rendered notes and page numbers.
///
/// Sizes are in points. Colours are `RRGGBB` hex strings in configuration
/// files.
///
/// # Examples
///
/// ```rust
/// use deckscribe::markdown::Typography;
///
/// let typography = Typography::default().with_body_size(12.0);
/// assert_eq!(typography.body_size, 12.0);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Typography {
    /// `#` heading size
    pub heading1_size: f64,
    /// `##` heading size
    pub heading2_size: f64,
    /// `###` heading size
    pub heading3_size: f64,
    /// Body text, bullets and numbered items
    pub body_size: f64,
    pub heading_color: Option<RgbColor>,
    pub body_color: Option<RgbColor>,
    pub page_number_size: f64,
    pub page_number_bold: bool,
    pub page_number_color: Option<RgbColor>,
    /// Text placed before the number, e.g. `"Page "`
    pub page_number_prefix: String,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            heading1_size: 24.0,
            heading2_size: 20.0,
            heading3_size: 16.0,
            body_size: 14.0,
            heading_color: Some(RgbColor(0x33, 0x33, 0x33)),
            body_color: None,
            page_number_size: 14.0,
            page_number_bold: true,
            page_number_color: Some(RgbColor(0x50, 0x50, 0x50)),
            page_number_prefix: String::new(),
        }
    }
}

impl Typography {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_body_size(mut self, size: f64) -> Self {
        self.body_size = size;
        self
    }

    #[inline]
    pub fn with_page_number_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.page_number_prefix = prefix.into();
        self
    }

    /// Size of a heading of the given level (1 to 3).
    pub fn heading_size(&self, level: usize) -> f64 {
        match level {
            1 => self.heading1_size,
            2 => self.heading2_size,
            _ => self.heading3_size,
        }
    }

    /// Label stamped on an original slide.
    pub fn page_label(&self, page_number: usize) -> String {
        format!("{}{}", self.page_number_prefix, page_number)
    }

    /// Every size must be positive.
    pub fn validate(&self) -> Result<(), String> {
        let sizes = [
            ("heading1_size", self.heading1_size),
            ("heading2_size", self.heading2_size),
            ("heading3_size", self.heading3_size),
            ("body_size", self.body_size),
            ("page_number_size", self.page_number_size),
        ];
        for (name, size) in sizes {
            if !(size.is_finite() && size > 0.0) {
                return Err(format!("typography.{} must be a positive number, got {}", name, size));
            }
        }
        Ok(())
    }
}
