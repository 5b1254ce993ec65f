//! Stand-in images for slides that could not be rendered.

use crate::common::Result;
use crate::render::ScreenshotProvider;
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{ImageFormat, Rgb, RgbImage};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub const PLACEHOLDER_WIDTH: u32 = 1280;
pub const PLACEHOLDER_HEIGHT: u32 = 720;

const BACKGROUND: Rgb<u8> = Rgb([220, 220, 220]);
const INK: Rgb<u8> = Rgb([80, 80, 80]);
/// Each font pixel becomes a `GLYPH_SCALE` square.
const GLYPH_SCALE: u32 = 10;

/// Writes light-grey PNGs labelled "Slide N", one per slide number.
#[derive(Debug)]
pub struct PlaceholderFactory {
    dir: PathBuf,
    written: HashMap<usize, PathBuf>,
}

impl PlaceholderFactory {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            written: HashMap::new(),
        }
    }

    /// Number of distinct placeholders written so far.
    pub fn count(&self) -> usize {
        self.written.len()
    }

    /// Path to the placeholder for `slide_number`, writing it if needed.
    pub fn placeholder(&mut self, slide_number: usize) -> Result<PathBuf> {
        if let Some(path) = self.written.get(&slide_number) {
            return Ok(path.clone());
        }

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("placeholder-{}.png", slide_number));
        render_placeholder(&format!("Slide {}", slide_number))
            .save_with_format(&path, ImageFormat::Png)?;
        debug!(slide = slide_number, path = %path.display(), "placeholder written");

        self.written.insert(slide_number, path.clone());
        Ok(path)
    }
}

impl ScreenshotProvider for PlaceholderFactory {
    fn screenshot(&mut self, slide_number: usize) -> Result<PathBuf> {
        self.placeholder(slide_number)
    }
}

/// The placeholder bitmap with `label` centred.
pub fn render_placeholder(label: &str) -> RgbImage {
    let mut img = RgbImage::from_pixel(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT, BACKGROUND);

    let glyph_size = 8 * GLYPH_SCALE;
    let text_width = label.chars().count() as u32 * glyph_size;
    let x = PLACEHOLDER_WIDTH.saturating_sub(text_width) / 2;
    let y = (PLACEHOLDER_HEIGHT - glyph_size) / 2;
    draw_text(&mut img, x, y, label);
    img
}

fn draw_text(img: &mut RgbImage, x: u32, y: u32, text: &str) {
    let mut cursor_x = x;
    for ch in text.chars() {
        let glyph = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?'));
        if let Some(glyph) = glyph {
            for (row_idx, &row_bits) in glyph.iter().enumerate() {
                for col_idx in 0..8u32 {
                    if (row_bits >> col_idx) & 1 == 0 {
                        continue;
                    }
                    let px = cursor_x + col_idx * GLYPH_SCALE;
                    let py = y + row_idx as u32 * GLYPH_SCALE;
                    fill_square(img, px, py);
                }
            }
        }
        cursor_x += 8 * GLYPH_SCALE;
    }
}

fn fill_square(img: &mut RgbImage, px: u32, py: u32) {
    for ty in py..(py + GLYPH_SCALE).min(img.height()) {
        for tx in px..(px + GLYPH_SCALE).min(img.width()) {
            img.put_pixel(tx, ty, INK);
        }
    }
}
