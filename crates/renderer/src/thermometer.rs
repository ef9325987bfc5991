use crate::raster::{Point, RasterImage};
use tray_theme::{Color, GradientRamp};

/// Outline on a 22-unit grid; the first six points are the tube.
#[rustfmt::skip]
const SHAPE: [Point; 13] = [
    (2, 16), (2, 2), (3, 1), (4, 1), (5, 2), (5, 16),
    (6, 17), (6, 19), (5, 20), (2, 20), (1, 19), (1, 17), (2, 16),
];
const TUBE: usize = 6;
const GRID: i32 = 22;

/// At or above this many °C the thermometer blinks.
pub const HOT: i32 = 85;

/// Celsius to a temperature-ramp index: 5 °C maps to `0`, 104 °C to `99`.
pub fn temp_index(celsius: i32) -> usize {
    ((i64::from(celsius) - 5) * 100 / 100).clamp(0, 99) as usize
}

/// Whether the overlay shows for `celsius` on tick number `tick`.
///
/// Hidden when there is no reading; when hot, shown on even ticks only.
pub fn visible(celsius: i32, tick: u64) -> bool {
    celsius != 0 && (celsius < HOT || tick % 2 == 0)
}

/// The thermometer outline scaled to one icon width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thermometer {
    width:   u32,
    outline: [Point; 13],
}

impl Thermometer {
    pub fn new(width: u32) -> Self {
        let w = width as i32;
        Self {
            width,
            outline: SHAPE.map(|(x, y)| (x * w / GRID, y * w / GRID)),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn outline(&self) -> &[Point] {
        &self.outline
    }

    /// The empty part of the tube above the mercury for ramp index `t`,
    /// or `None` when the tube is full.
    pub fn cutout(&self, t: usize) -> Option<[Point; TUBE]> {
        if t >= 99 {
            return None;
        }
        let t = t as i32;
        let (bottom, top) = (self.outline[0].1, self.outline[1].1);
        let level = (t * top + (99 - t) * bottom) / 99;

        let mut tube = [(0, 0); TUBE];
        tube.copy_from_slice(&self.outline[..TUBE]);
        tube[0].1 = level;
        tube[TUBE - 1].1 = level;
        Some(tube)
    }

    /// Fill, hollow out the tube above the mercury, then outline.
    pub fn draw(
        &self,
        img: &mut RasterImage,
        celsius: i32,
        ramp: &GradientRamp,
        background: Color,
        foreground: Color,
    ) {
        let t = temp_index(celsius);
        img.fill_polygon(&self.outline, ramp.at(t));
        if let Some(tube) = self.cutout(t) {
            img.fill_polygon(&tube, background);
        }
        img.draw_polyline(&self.outline, foreground);
    }
}
