//! The editable slide list the composer works on.

use crate::common::Result;
use crate::layout::geometry::{ImageSize, Rect, SlideSize};
use crate::ooxml::pptx::{Deck, TextBody};
use std::path::Path;

/// An ordered, growable list of slides.
///
/// Positions are 0-based and refer to the live list, so every insertion
/// shifts the positions of the slides after it.
pub trait SlideSequence {
    /// Get the current number of slides.
    fn slide_count(&self) -> usize;

    /// Get the slide dimensions in EMUs.
    fn slide_size(&self) -> SlideSize;

    /// Insert an empty slide so that it ends up at `position`.
    fn insert_blank_slide(&mut self, position: usize) -> Result<()>;

    /// Place an image file on the slide at `position`.
    fn add_picture(&mut self, position: usize, image: &Path, description: &str, frame: Rect)
    -> Result<()>;

    /// Place a text box on the slide at `position`.
    fn add_text_box(&mut self, position: usize, name: &str, body: &TextBody, frame: Rect)
    -> Result<()>;
}

impl SlideSequence for Deck {
    fn slide_count(&self) -> usize {
        Deck::slide_count(self)
    }

    fn slide_size(&self) -> SlideSize {
        Deck::slide_size(self)
    }

    fn insert_blank_slide(&mut self, position: usize) -> Result<()> {
        Ok(Deck::insert_blank_slide(self, position)?)
    }

    fn add_picture(
        &mut self,
        position: usize,
        image: &Path,
        description: &str,
        frame: Rect,
    ) -> Result<()> {
        Ok(Deck::add_picture(self, position, image, description, frame)?)
    }

    fn add_text_box(
        &mut self,
        position: usize,
        name: &str,
        body: &TextBody,
        frame: Rect,
    ) -> Result<()> {
        Ok(Deck::add_text_box(self, position, name, body, frame)?)
    }
}

/// Pixel size of an image file, read from its header.
pub fn image_size(path: &Path) -> Result<ImageSize> {
    let (width, height) = image::image_dimensions(path)?;
    Ok(ImageSize::new(width, height))
}
