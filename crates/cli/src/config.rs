use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use typescan_graph::{DiagramConfig, ScanConfig};

/// Environment variable naming a config file when `--config` is absent
pub const CONFIG_ENV: &str = "TYPESCAN_CONFIG";

/// Contents of a `typescan.toml` file
///
/// ```toml
/// [scan]
/// enable_external_types = true
/// root_type = "java.lang.Object"
///
/// [diagram]
/// width = 20.0
/// show_routines = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub scan: ScanConfig,
    pub diagram: DiagramConfig,
}

impl FileConfig {
    /// Load from an explicit path, else from `$TYPESCAN_CONFIG`, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
