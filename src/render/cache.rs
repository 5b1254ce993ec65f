//! Rendered pages cached on disk, keyed by the SHA-256 of the deck.

use crate::common::Result;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lowercase hex SHA-256 of a deck's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let digest = hasher.finalize();

        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest.iter() {
            let _ = write!(hex, "{:02x}", byte);
        }
        Self(hex)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_bytes(&fs::read(path)?))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directory of per-deck page images.
///
/// Layout: `<root>/<key>/page-<n>.png`, one image per slide.
#[derive(Debug, Clone)]
pub struct ScreenshotCache {
    root: PathBuf,
}

impl ScreenshotCache {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the pages for `key`.
    pub fn dir(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.as_str())
    }

    /// Create the directory for `key` and return it.
    pub fn prepare(&self, key: &CacheKey) -> Result<PathBuf> {
        let dir = self.dir(key);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Cached page images for `key` in page order, or `None` if nothing is
    /// cached yet.
    pub fn pages(&self, key: &CacheKey) -> Result<Option<Vec<PathBuf>>> {
        let dir = self.dir(key);
        if !dir.is_dir() {
            return Ok(None);
        }

        let mut pages: Vec<(usize, PathBuf)> = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            let is_png = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
            if !is_png {
                continue;
            }
            if let Some(number) = path.file_stem().and_then(|s| s.to_str()).and_then(page_number) {
                pages.push((number, path));
            }
        }

        if pages.is_empty() {
            return Ok(None);
        }
        pages.sort_by_key(|(number, _)| *number);
        debug!(key = %key, count = pages.len(), "cached pages found");
        Ok(Some(pages.into_iter().map(|(_, path)| path).collect()))
    }

    /// Drop whatever is cached for `key`.
    pub fn invalidate(&self, key: &CacheKey) -> Result<()> {
        let dir = self.dir(key);
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        Ok(())
    }
}

/// Page number from a stem such as `page-7` or `page-07`.
fn page_number(stem: &str) -> Option<usize> {
    let digits_start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    stem[digits_start..].parse().ok()
}
