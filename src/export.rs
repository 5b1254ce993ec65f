//! PDF export of the finished deck.

use crate::common::{Error, Result};
use crate::render::probe::{SOFFICE, resolve};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Convert `deck` to PDF next to it with LibreOffice.
///
/// `soffice` overrides the `PATH` lookup. Returns the path of the PDF.
pub fn export_pdf(deck: &Path, soffice: Option<&Path>) -> Result<PathBuf> {
    let soffice = resolve(soffice, SOFFICE).ok_or_else(|| {
        Error::RenderingUnavailable(format!("{} is not installed or not in PATH", SOFFICE))
    })?;

    let deck = deck.canonicalize()?;
    let out_dir = deck
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let pdf = deck.with_extension("pdf");
    debug!(soffice = %soffice.display(), out_dir = %out_dir.display(), "exporting PDF");

    let output = Command::new(&soffice)
        .args(["--headless", "--convert-to", "pdf", "--outdir"])
        .arg(&out_dir)
        .arg(&deck)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::Export {
            path: deck.clone(),
            reason: format!("failed to run {}: {}", soffice.display(), e),
        })?;

    if !output.status.success() {
        return Err(Error::Export {
            path: deck,
            reason: format!(
                "{} exited with {}: {}",
                soffice.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }
    if !pdf.is_file() {
        return Err(Error::Export {
            path: deck,
            reason: format!("{} was not created", pdf.display()),
        });
    }

    info!(pdf = %pdf.display(), "PDF created");
    Ok(pdf)
}
