//! Run configuration, optionally loaded from YAML.
//!
//! Every field has a default, so an empty file, a partial file, or no file
//! at all are all valid:
//!
//! ```yaml
//! output_dir: build/decks
//! layout:
//!   screenshot_width_ratio: 0.35
//! typography:
//!   body_size: 12.0
//!   page_number_prefix: "Page "
//!   page_number_color: "404040"
//! render:
//!   dpi: 150
//!   soffice: /opt/libreoffice/program/soffice
//! ```

use crate::common::{Error, Result};
use crate::layout::LayoutConfig;
use crate::markdown::Typography;
use crate::render::RenderConfig;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub layout: LayoutConfig,
    pub typography: Typography,
    pub render: RenderConfig,
    /// Directory for generated decks when no output path is given
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            typography: Typography::default(),
            render: RenderConfig::default(),
            output_dir: PathBuf::from("data_out"),
        }
    }
}

impl Config {
    /// Parse and validate a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Config = if text.trim().is_empty() {
            Config::default()
        } else {
            serde_saphyr::from_str(text)
                .map_err(|e| Error::Configuration(format!("invalid configuration: {}", e)))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_yaml(&text).map_err(|e| match e {
            Error::Configuration(reason) => {
                Error::Configuration(format!("{}: {}", path.display(), reason))
            },
            other => other,
        })?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// The file at `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// `<output_dir>/<input stem>_output_<YYYYmmdd_HHMMSS>.pptx`
    pub fn default_output_path(&self, input: &Path, now: NaiveDateTime) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "deck".to_string());
        self.output_dir.join(format!(
            "{}_output_{}.pptx",
            stem,
            now.format("%Y%m%d_%H%M%S")
        ))
    }

    pub fn validate(&self) -> Result<()> {
        self.layout
            .validate()
            .and_then(|()| self.typography.validate())
            .and_then(|()| self.render.validate())
            .map_err(Error::Configuration)
    }
}
