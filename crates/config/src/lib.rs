pub mod schema;
pub mod watcher;

pub use schema::{ColorsConfig, OptionsConfig, TrayConfig};
pub use watcher::ConfigWatcher;

use std::path::{Path, PathBuf};
use tray_core::{Result, TrayError};

/// Load configuration from a TOML file.  Returns `TrayConfig::default()` if
/// the file doesn't exist so the icon always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<TrayConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(TrayConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| TrayError::Config(format!("cannot read '{}': {e}", path.display())))?;

    parse(&raw)
}

/// Parse configuration from TOML text.
pub fn parse(raw: &str) -> Result<TrayConfig> {
    toml::from_str(raw).map_err(|e| TrayError::Config(format!("TOML parse error: {e}")))
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("cputray").join("cputray.toml")
}

/// Where the rendered icon is written when `options.output` is empty.
pub fn default_output_path() -> PathBuf {
    let base = std::env::var("XDG_RUNTIME_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir());
    base.join("cputray").join("icon.png")
}
