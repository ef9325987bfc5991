//! Draws the sampled history into the square tray icon.
//!
//! Each column is one history entry, oldest on the left: an iowait strip
//! from the bottom with the usage bar stacked on top, coloured by clock
//! frequency. A thermometer showing the latest temperature is drawn over
//! the bars.

pub mod icon;
pub mod raster;
pub mod thermometer;

pub use raster::{Point, RasterImage};
pub use thermometer::Thermometer;

use tray_core::Sample;
use tray_theme::{Palette, STEPS};

/// Renders icons, caching the thermometer geometry between sizes.
#[derive(Debug, Default)]
pub struct Renderer {
    thermometer: Option<Thermometer>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `history` (newest first) as a `width` x `width` image.
    ///
    /// Rates are on `[0, scale]`; `tick` sets the blink phase of a hot
    /// thermometer. Columns without history stay background.
    pub fn render(
        &mut self,
        history: &[Sample],
        palette: &Palette,
        width: u32,
        scale: u32,
        tick: u64,
    ) -> RasterImage {
        let scale = scale.max(1);
        let mut img = RasterImage::new(width, palette.background);

        for x in 0..width {
            let Some(entry) = history.get((width - 1 - x) as usize) else {
                continue;
            };
            draw_column(&mut img, x, entry, palette, scale);
        }

        if let Some(latest) = history.first() {
            if thermometer::visible(latest.temp, tick) {
                self.scaled_thermometer(width).draw(
                    &mut img,
                    latest.temp,
                    &palette.gradients.temperature,
                    palette.background,
                    palette.foreground,
                );
            }
        }

        img
    }

    fn scaled_thermometer(&mut self, width: u32) -> &Thermometer {
        if self.thermometer.as_ref().map(Thermometer::width) != Some(width) {
            tracing::debug!("scaling thermometer to {width}px");
            self.thermometer = None;
        }
        self.thermometer.get_or_insert_with(|| Thermometer::new(width))
    }
}

/// `value * width / scale`, capped at `width`.
fn bar_height(value: u32, width: u32, scale: u32) -> u32 {
    (u64::from(value) * u64::from(width) / u64::from(scale)).min(u64::from(width)) as u32
}

/// Gradient index for a frequency ratio.
fn shade(freq_ratio: u32, scale: u32) -> usize {
    (u64::from(freq_ratio) * (STEPS as u64 - 1) / u64::from(scale)).min(STEPS as u64 - 1) as usize
}

fn draw_column(img: &mut RasterImage, x: u32, entry: &Sample, palette: &Palette, scale: u32) {
    let width = img.side();

    let iowait = bar_height(entry.cpu.iowait, width, scale);
    let bottom = width - iowait;
    if iowait > 0 {
        img.fill_column(x, bottom, width, palette.iowait);
    }

    let usage = bar_height(entry.cpu.usage, width, scale);
    let color = palette.gradients.frequency[shade(entry.freq_ratio, scale)];
    img.fill_column(x, bottom.saturating_sub(usage), bottom, color);
}
