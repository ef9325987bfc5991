use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure parsed from `cputray.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrayConfig {
    /// Colour preferences feeding the palette and gradient ramps.
    pub colors:  ColorsConfig,
    /// Behaviour toggles and sizes.
    pub options: OptionsConfig,
}

/// Colour preferences.  Each value is `#rrggbb`, `#rrrrggggbbbb` or a preset name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    /// Thermometer outline.
    pub foreground: String,
    /// Icon background (and the transparency key).
    pub background: String,
    /// Bottom strip for time spent waiting on I/O.
    pub iowait:     String,
    /// Usage bar colour at the minimum clock frequency.
    pub freq_min:   String,
    /// Usage bar colour at the maximum clock frequency.
    pub freq_max:   String,
    /// Thermometer fill at 5 °C and below.
    pub temp_min:   String,
    /// Thermometer fill at 104 °C and above.
    pub temp_max:   String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            foreground: "black".to_string(),
            background: "white".to_string(),
            iowait:     "blue".to_string(),
            freq_min:   "green".to_string(),
            freq_max:   "red".to_string(),
            temp_min:   "blue".to_string(),
            temp_max:   "red".to_string(),
        }
    }
}

/// Runtime options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsConfig {
    /// Make background-coloured pixels transparent on export.
    pub transparent: bool,
    /// Companion command for the icon host to launch on click.
    pub command:     String,
    /// Sampling period in milliseconds.
    pub interval_ms: u64,
    /// Square icon width in pixels.
    pub icon_size:   u32,
    /// PNG output path; empty = `$XDG_RUNTIME_DIR/cputray/icon.png`.
    pub output:      PathBuf,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            transparent: true,
            command:     "x-terminal-emulator -e top".to_string(),
            interval_ms: 1000,
            icon_size:   22,
            output:      PathBuf::new(),
        }
    }
}

impl OptionsConfig {
    /// Resolved icon output path.
    pub fn output_path(&self) -> PathBuf {
        if self.output.as_os_str().is_empty() {
            crate::default_output_path()
        } else {
            self.output.clone()
        }
    }
}
