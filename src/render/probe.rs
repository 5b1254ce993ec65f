//! Detection of the external converters.

use crate::render::RenderConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SOFFICE: &str = "soffice";
pub const PDFTOPPM: &str = "pdftoppm";

/// Whether real slide screenshots can be produced on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCapability {
    Available { soffice: PathBuf, pdftoppm: PathBuf },
    Unavailable { reason: String },
}

impl RenderCapability {
    #[inline]
    pub fn is_available(&self) -> bool {
        matches!(self, RenderCapability::Available { .. })
    }
}

/// Resolve both converters, from the configuration or from `PATH`.
pub fn probe_capability(config: &RenderConfig) -> RenderCapability {
    if !config.enabled {
        return RenderCapability::Unavailable {
            reason: "rendering disabled".to_string(),
        };
    }

    let soffice = resolve(config.soffice.as_deref(), SOFFICE);
    let pdftoppm = resolve(config.pdftoppm.as_deref(), PDFTOPPM);
    let capability = match (soffice, pdftoppm) {
        (Some(soffice), Some(pdftoppm)) => RenderCapability::Available { soffice, pdftoppm },
        (None, _) => RenderCapability::Unavailable {
            reason: format!("{} not found", SOFFICE),
        },
        (_, None) => RenderCapability::Unavailable {
            reason: format!("{} not found", PDFTOPPM),
        },
    };
    info!(?capability, "render capability");
    capability
}

/// An explicit path must name an executable; otherwise search `PATH` for
/// `name`.
pub fn resolve(explicit: Option<&Path>, name: &str) -> Option<PathBuf> {
    let found = match explicit {
        Some(path) => which::which(path),
        None => which::which(name),
    };
    debug!(name, explicit = ?explicit, found = ?found, "converter lookup");
    found.ok()
}
