pub mod colors;
pub mod gradient;

pub use colors::Color;
pub use gradient::{GradientRamp, GradientTable, STEPS};

use tray_config::ColorsConfig;

/// Compiled colours derived from [`ColorsConfig`].
///
/// Calling [`Palette::from_config`] is infallible: invalid colour strings
/// fall back to the preset defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub foreground: Color,
    pub background: Color,
    pub iowait:     Color,
    pub gradients:  GradientTable,
}

impl Palette {
    /// Build a [`Palette`] from the config file's `[colors]` section.
    pub fn from_config(cfg: &ColorsConfig) -> Self {
        let mut palette = Self {
            foreground: Color::BLACK,
            background: Color::WHITE,
            iowait:     Color::BLUE,
            gradients:  GradientTable::new((Color::GREEN, Color::RED), (Color::BLUE, Color::RED)),
        };
        palette.apply(cfg);
        palette
    }

    /// Re-read every colour from `cfg` and rebuild both gradient ramps.
    pub fn apply(&mut self, cfg: &ColorsConfig) {
        let freq = (
            Color::parse_or(&cfg.freq_min, Color::GREEN, "min frequency"),
            Color::parse_or(&cfg.freq_max, Color::RED, "max frequency"),
        );
        let temp = (
            Color::parse_or(&cfg.temp_min, Color::BLUE, "min temperature"),
            Color::parse_or(&cfg.temp_max, Color::RED, "max temperature"),
        );

        self.foreground = Color::parse_or(&cfg.foreground, Color::BLACK, "foreground");
        self.background = Color::parse_or(&cfg.background, Color::WHITE, "background");
        self.iowait = Color::parse_or(&cfg.iowait, Color::BLUE, "I/O wait");
        self.gradients.rebuild(freq, temp);
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_config(&ColorsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_presets() {
        let palette = Palette::default();
        assert_eq!(palette.foreground, Color::BLACK);
        assert_eq!(palette.background, Color::WHITE);
        assert_eq!(palette.iowait, Color::BLUE);
        assert_eq!(palette.gradients.frequency[0], Color::GREEN);
        assert_eq!(palette.gradients.frequency[99], Color::RED);
        assert_eq!(palette.gradients.temperature[0], Color::BLUE);
    }

    #[test]
    fn bad_colour_falls_back() {
        let cfg = ColorsConfig {
            background: "not-a-colour".into(),
            freq_max: "#000".into(),
            ..ColorsConfig::default()
        };
        let palette = Palette::from_config(&cfg);
        assert_eq!(palette.background, Color::WHITE);
        assert_eq!(palette.gradients.frequency[99], Color::BLACK);
    }

    #[test]
    fn apply_rebuilds_ramps_in_place() {
        let mut palette = Palette::default();
        let cfg = ColorsConfig {
            foreground: "white".into(),
            temp_min: "black".into(),
            temp_max: "white".into(),
            ..ColorsConfig::default()
        };
        palette.apply(&cfg);
        assert_eq!(palette, Palette::from_config(&cfg));
        assert_eq!(palette.foreground, Color::WHITE);
        assert_eq!(palette.gradients.temperature[0], Color::BLACK);
        assert_eq!(palette.gradients.temperature[99], Color::WHITE);
    }
}
