//! Slide screenshots.
//!
//! A [`ScreenshotProvider`] turns a 1-based slide number into a raster image
//! on disk. [`OfficeRenderer`] does this with LibreOffice and poppler,
//! caching the pages under a content hash of the deck; when those tools are
//! missing the composer falls back to [`PlaceholderFactory`].

pub mod cache;
pub mod office;
pub mod placeholder;
pub mod probe;

pub use cache::{CacheKey, ScreenshotCache};
pub use office::OfficeRenderer;
pub use placeholder::PlaceholderFactory;
pub use probe::{RenderCapability, probe_capability};

use crate::common::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Source of slide images.
pub trait ScreenshotProvider {
    /// Path to an image of the given slide (1-based).
    ///
    /// Fails with [`Error::RenderingUnavailable`](crate::common::Error::RenderingUnavailable)
    /// when no image can be produced.
    fn screenshot(&mut self, slide_number: usize) -> Result<PathBuf>;
}

/// Provider for hosts without the converters; every request fails.
#[derive(Debug, Clone)]
pub struct NoRenderer {
    reason: String,
}

impl NoRenderer {
    pub fn new<S: Into<String>>(reason: S) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl ScreenshotProvider for NoRenderer {
    fn screenshot(&mut self, _slide_number: usize) -> Result<PathBuf> {
        Err(Error::RenderingUnavailable(self.reason.clone()))
    }
}

/// External rendering settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Set to false to always use placeholders
    pub enabled: bool,
    /// Root of the per-deck page caches
    pub cache_dir: PathBuf,
    /// Raster resolution passed to `pdftoppm -r`
    pub dpi: u32,
    /// LibreOffice binary; looked up on `PATH` when unset
    pub soffice: Option<PathBuf>,
    /// Poppler `pdftoppm` binary; looked up on `PATH` when unset
    pub pdftoppm: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: PathBuf::from("data_out/.screenshots"),
            dpi: 110,
            soffice: None,
            pdftoppm: None,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(10..=1200).contains(&self.dpi) {
            return Err(format!("render.dpi must be between 10 and 1200, got {}", self.dpi));
        }
        Ok(())
    }
}
