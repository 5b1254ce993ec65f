//! Real screenshots via LibreOffice and poppler.
//!
//! The deck is converted once with `soffice --headless --convert-to pdf`,
//! then split into one PNG per page with `pdftoppm`. Both steps write into
//! the cache directory for the deck's content hash, so a second run over an
//! unchanged deck starts no external process.

use crate::common::{Error, Result};
use crate::render::cache::{CacheKey, ScreenshotCache};
use crate::render::probe::RenderCapability;
use crate::render::{RenderConfig, ScreenshotProvider};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tracing::{debug, info, warn};

/// Prefix of the page images written by `pdftoppm`.
const PAGE_PREFIX: &str = "page";

/// Impress PDF filter that keeps hidden slides, so page N is always slide N.
const PDF_FILTER: &str =
    r#"pdf:impress_pdf_Export:{"ExportHiddenSlides":{"type":"boolean","value":"true"}}"#;

/// Screenshot provider backed by the external converters.
#[derive(Debug)]
pub struct OfficeRenderer {
    deck: PathBuf,
    soffice: PathBuf,
    pdftoppm: PathBuf,
    dpi: u32,
    cache: ScreenshotCache,
    expected_pages: Option<usize>,
    pages: Option<Vec<PathBuf>>,
    failure: Option<String>,
}

impl OfficeRenderer {
    pub fn new<P: Into<PathBuf>>(
        deck: P,
        soffice: PathBuf,
        pdftoppm: PathBuf,
        cache: ScreenshotCache,
        dpi: u32,
    ) -> Self {
        Self {
            deck: deck.into(),
            soffice,
            pdftoppm,
            dpi,
            cache,
            expected_pages: None,
            pages: None,
            failure: None,
        }
    }

    /// Require one rendered page per slide of a `slide_count` slide deck.
    pub fn with_expected_pages(mut self, slide_count: usize) -> Self {
        self.expected_pages = Some(slide_count);
        self
    }

    /// Build a renderer when the probe found both converters.
    pub fn from_capability<P: Into<PathBuf>>(
        deck: P,
        capability: &RenderCapability,
        config: &RenderConfig,
    ) -> Option<Self> {
        match capability {
            RenderCapability::Available { soffice, pdftoppm } => Some(Self::new(
                deck,
                soffice.clone(),
                pdftoppm.clone(),
                ScreenshotCache::new(&config.cache_dir),
                config.dpi,
            )),
            RenderCapability::Unavailable { .. } => None,
        }
    }

    /// Rendered page images, producing them on first use.
    pub fn pages(&mut self) -> Result<&[PathBuf]> {
        if let Some(reason) = &self.failure {
            return Err(Error::RenderingUnavailable(reason.clone()));
        }
        if self.pages.is_none() {
            match self.load_or_render() {
                Ok(pages) => self.pages = Some(pages),
                Err(e) => {
                    self.failure = Some(match &e {
                        Error::RenderingUnavailable(reason) => reason.clone(),
                        other => other.to_string(),
                    });
                    return Err(e);
                },
            }
        }
        Ok(self.pages.as_deref().unwrap_or_default())
    }

    fn load_or_render(&self) -> Result<Vec<PathBuf>> {
        let key = CacheKey::from_file(&self.deck)?;
        if let Some(pages) = self.cache.pages(&key)? {
            if self.page_count_matches(pages.len()) {
                info!(key = %key, pages = pages.len(), "reusing cached screenshots");
                return Ok(pages);
            }
            warn!(
                key = %key,
                pages = pages.len(),
                expected = ?self.expected_pages,
                "cached screenshots do not match the deck, rendering again"
            );
            self.cache.invalidate(&key)?;
        }

        let dir = self.cache.prepare(&key)?;
        info!(deck = %self.deck.display(), dir = %dir.display(), "rendering slides");
        let rendered = self.render_into(&dir).and_then(|()| {
            let pages = self.cache.pages(&key)?.ok_or_else(|| {
                Error::RenderingUnavailable(format!("{} produced no page images", self.pdftoppm.display()))
            })?;
            if !self.page_count_matches(pages.len()) {
                warn!(
                    pages = pages.len(),
                    expected = ?self.expected_pages,
                    "rendered page count differs from slide count"
                );
                return Err(Error::RenderingUnavailable(format!(
                    "rendered {} pages for {} slides",
                    pages.len(),
                    self.expected_pages.unwrap_or_default()
                )));
            }
            Ok(pages)
        });
        if rendered.is_err()
            && let Err(e) = self.cache.invalidate(&key)
        {
            warn!(error = %e, "could not clear incomplete screenshot cache");
        }
        rendered
    }

    fn page_count_matches(&self, pages: usize) -> bool {
        self.expected_pages.is_none_or(|expected| expected == pages)
    }

    fn render_into(&self, dir: &Path) -> Result<()> {
        let output = Command::new(&self.soffice)
            .args(["--headless", "--convert-to", PDF_FILTER, "--outdir"])
            .arg(dir)
            .arg(&self.deck)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| tool_error(&self.soffice, &e.to_string()))?;
        check_status(&self.soffice, &output)?;

        let mut pdf_name = self
            .deck
            .file_stem()
            .unwrap_or_else(|| OsStr::new("deck"))
            .to_os_string();
        pdf_name.push(".pdf");
        let pdf = dir.join(pdf_name);
        if !pdf.is_file() {
            return Err(Error::RenderingUnavailable(format!(
                "{} did not produce {}",
                self.soffice.display(),
                pdf.display()
            )));
        }

        let output = Command::new(&self.pdftoppm)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(&pdf)
            .arg(dir.join(PAGE_PREFIX))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| tool_error(&self.pdftoppm, &e.to_string()))?;
        check_status(&self.pdftoppm, &output)?;

        if let Err(e) = fs::remove_file(&pdf) {
            debug!(error = %e, "intermediate PDF left in cache");
        }
        Ok(())
    }
}

impl ScreenshotProvider for OfficeRenderer {
    fn screenshot(&mut self, slide_number: usize) -> Result<PathBuf> {
        let pages = self.pages()?;
        slide_number
            .checked_sub(1)
            .and_then(|index| pages.get(index))
            .cloned()
            .ok_or_else(|| {
                Error::RenderingUnavailable(format!(
                    "no rendered page for slide {} ({} pages)",
                    slide_number,
                    pages.len()
                ))
            })
    }
}

fn tool_error(tool: &Path, reason: &str) -> Error {
    Error::RenderingUnavailable(format!("failed to run {}: {}", tool.display(), reason))
}

fn check_status(tool: &Path, output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(tool_error(
        tool,
        &format!("{} ({})", output.status, stderr.trim()),
    ))
}
