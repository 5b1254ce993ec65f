//! Unit conversion utilities.
//!
//! Slide geometry is kept in EMU (English Metric Units), the native
//! DrawingML coordinate unit. Text sizes are carried in points and written
//! to XML in hundredths of a point.

pub const EMUS_PER_INCH: i64 = 914_400;

#[inline]
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMUS_PER_INCH as f64).round() as i64
}

/// Font size in points to the `sz` attribute of `a:rPr` (1/100 pt).
#[inline]
pub fn pt_to_centipoints(pt: f64) -> u32 {
    (pt * 100.0).round().max(0.0) as u32
}

/// Slide dimensions in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideSize {
    pub width: i64,
    pub height: i64,
}

impl SlideSize {
    /// 10in x 7.5in, the 4:3 size a presentation falls back to when
    /// `p:sldSz` is absent.
    pub const DEFAULT: SlideSize = SlideSize {
        width: 9_144_000,
        height: 6_858_000,
    };

    pub const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }
}

impl Default for SlideSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// An axis-aligned frame on a slide, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub const fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub const fn right(&self) -> i64 {
        self.left + self.width
    }

    #[inline]
    pub const fn bottom(&self) -> i64 {
        self.top + self.height
    }

    /// Whether the two frames share any area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// Whether the frame lies entirely within a slide.
    pub fn fits_within(&self, size: SlideSize) -> bool {
        self.left >= 0 && self.top >= 0 && self.right() <= size.width && self.bottom() <= size.height
    }
}
