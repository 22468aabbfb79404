use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Renderer settings. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// How long to wait for the writer to signal that all output was
    /// emitted.
    pub emission_timeout_ms: u64,
    /// Root for relative resource paths; the working directory when unset.
    pub base_dir: Option<PathBuf>,
    pub http_user_agent: String,
    /// Fall back to HTTP(S) for sources missing on the filesystem.
    pub network: bool,
    /// Only serve filesystem sources that stay below `base_dir`.
    pub sandbox: bool,
    pub default_font_size: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            emission_timeout_ms: 5_000,
            base_dir: None,
            http_user_agent: concat!("inkpage/", env!("CARGO_PKG_VERSION")).to_string(),
            network: true,
            sandbox: false,
            default_font_size: 12.0,
        }
    }
}

impl RenderConfig {
    pub fn emission_timeout(&self) -> Duration {
        Duration::from_millis(self.emission_timeout_ms)
    }

    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        serde_json::from_str(json).map_err(|e| RenderError::Config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            RenderError::Config(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub(crate) fn validate(&self) -> Result<(), RenderError> {
        if !(self.default_font_size.is_finite() && self.default_font_size > 0.0) {
            return Err(RenderError::Config(format!(
                "default_font_size must be positive, got {}",
                self.default_font_size
            )));
        }
        if self.emission_timeout_ms == 0 {
            return Err(RenderError::Config(
                "emission_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
