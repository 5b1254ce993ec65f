//! Placement of the screenshot, notes and page-number shapes.
//!
//! All coordinates are EMUs. Ratios in [`LayoutConfig`] are fractions of the
//! slide width or height as documented on each field.

use crate::common::unit::inches_to_emu;
use serde::Deserialize;
use tracing::debug;

pub use crate::common::unit::{Rect, SlideSize};

/// Pixel dimensions of a raster image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    /// Fallback aspect for images that report a zero dimension.
    pub const WIDESCREEN: ImageSize = ImageSize {
        width: 1280,
        height: 720,
    };

    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn effective(&self) -> ImageSize {
        if self.is_degenerate() {
            Self::WIDESCREEN
        } else {
            *self
        }
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        let size = self.effective();
        f64::from(size.width) / f64::from(size.height)
    }
}

/// Proportions used to place shapes on an annotation slide.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Screenshot width, as a fraction of slide width
    pub screenshot_width_ratio: f64,
    /// Side margin, as a fraction of slide width
    pub margin_ratio: f64,
    /// Top margin, as a fraction of slide height
    pub top_margin_ratio: f64,
    /// Bottom margin below the notes, as a fraction of slide height
    pub bottom_margin_ratio: f64,
    /// Gap between notes and screenshot, as a fraction of slide width
    pub notes_gap_ratio: f64,
    /// Notes start this far below the screenshot top, as a fraction of screenshot height
    pub notes_offset_ratio: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            screenshot_width_ratio: 0.30,
            margin_ratio: 0.05,
            top_margin_ratio: 0.05,
            bottom_margin_ratio: 0.05,
            notes_gap_ratio: 0.02,
            notes_offset_ratio: 0.10,
        }
    }
}

impl LayoutConfig {
    /// Every ratio must lie strictly between 0 and 1.
    pub fn validate(&self) -> Result<(), String> {
        let ratios = [
            ("screenshot_width_ratio", self.screenshot_width_ratio),
            ("margin_ratio", self.margin_ratio),
            ("top_margin_ratio", self.top_margin_ratio),
            ("bottom_margin_ratio", self.bottom_margin_ratio),
            ("notes_gap_ratio", self.notes_gap_ratio),
            ("notes_offset_ratio", self.notes_offset_ratio),
        ];
        for (name, ratio) in ratios {
            if !(ratio > 0.0 && ratio < 1.0) {
                return Err(format!("layout.{} must be between 0 and 1, got {}", name, ratio));
            }
        }
        Ok(())
    }

    #[inline]
    fn margin(&self, slide: SlideSize) -> i64 {
        scale(slide.width, self.margin_ratio)
    }

    #[inline]
    fn top_margin(&self, slide: SlideSize) -> i64 {
        scale(slide.height, self.top_margin_ratio)
    }
}

/// Page-number box size and its distance from the bottom-right corner.
const PAGE_NUMBER_WIDTH_IN: f64 = 1.0;
const PAGE_NUMBER_HEIGHT_IN: f64 = 0.4;
const PAGE_NUMBER_RIGHT_IN: f64 = 1.2;
const PAGE_NUMBER_BOTTOM_IN: f64 = 0.5;

#[inline]
fn scale(value: i64, ratio: f64) -> i64 {
    (value as f64 * ratio).round() as i64
}

/// Frame of the screenshot on an annotation slide.
///
/// The picture keeps the image aspect ratio. It is
/// `screenshot_width_ratio` of the slide width wide unless that would make it
/// taller than the slide height minus two margins, in which case the height
/// is capped and the width follows. The right edge sits one margin in from
/// the slide edge and the top sits one top margin down.
pub fn screenshot_frame(slide: SlideSize, image: ImageSize, config: &LayoutConfig) -> Rect {
    let image = image.effective();
    let (image_w, image_h) = (i64::from(image.width), i64::from(image.height));
    let margin = config.margin(slide);
    let available_height = (slide.height - 2 * margin).max(1);

    let mut width = scale(slide.width, config.screenshot_width_ratio).max(1);
    let mut height = width * image_h / image_w;
    if height > available_height {
        height = available_height;
        width = height * image_w / image_h;
    }
    let width = width.max(1);
    let height = height.max(1);

    let frame = Rect::new(
        slide.width - margin - width,
        config.top_margin(slide),
        width,
        height,
    );
    debug!(
        left = frame.left,
        top = frame.top,
        width = frame.width,
        height = frame.height,
        "screenshot frame"
    );
    frame
}

/// Frame of the notes text box, left of the screenshot.
///
/// Returns `None` when the remaining region has no positive width or
/// height.
pub fn notes_frame(slide: SlideSize, screenshot: Rect, config: &LayoutConfig) -> Option<Rect> {
    let left = config.margin(slide);
    let right = screenshot.left - scale(slide.width, config.notes_gap_ratio);
    let top = config
        .top_margin(slide)
        .max(screenshot.top + scale(screenshot.height, config.notes_offset_ratio));
    let bottom = slide.height - scale(slide.height, config.bottom_margin_ratio);

    let width = right - left;
    let height = bottom - top;
    if width <= 0 || height <= 0 {
        debug!(width, height, "no room for notes");
        return None;
    }
    Some(Rect::new(left, top, width, height))
}

/// Frame of the page-number label near the bottom-right corner.
///
/// Slides smaller than the label box get a box clamped to the slide.
pub fn page_number_frame(slide: SlideSize) -> Rect {
    let width = inches_to_emu(PAGE_NUMBER_WIDTH_IN).min(slide.width).max(0);
    let height = inches_to_emu(PAGE_NUMBER_HEIGHT_IN).min(slide.height).max(0);
    let left = (slide.width - inches_to_emu(PAGE_NUMBER_RIGHT_IN)).clamp(0, slide.width - width);
    let top = (slide.height - inches_to_emu(PAGE_NUMBER_BOTTOM_IN)).clamp(0, slide.height - height);
    Rect::new(left, top, width, height)
}
