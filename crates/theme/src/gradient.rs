use crate::colors::Color;
use std::ops::Index;

/// Number of steps in every ramp.
pub const STEPS: usize = 100;

/// `STEPS` colours linearly interpolated between two endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientRamp([Color; STEPS]);

impl GradientRamp {
    /// Interpolate each channel independently:
    /// `ramp[i] = (min * (99 - i) + max * i) / 99`.
    pub fn new(min: Color, max: Color) -> Self {
        let last = (STEPS - 1) as u32;
        let lerp = |a: u16, b: u16, i: u32| -> u16 {
            ((a as u32 * (last - i) + b as u32 * i) / last) as u16
        };

        let mut ramp = [Color::default(); STEPS];
        for (i, slot) in ramp.iter_mut().enumerate() {
            let i = i as u32;
            *slot = Color::new(lerp(min.r, max.r, i), lerp(min.g, max.g, i), lerp(min.b, max.b, i));
        }
        Self(ramp)
    }

    /// Colour at `index`, clamped to the last step.
    #[inline]
    pub fn at(&self, index: usize) -> Color {
        self.0[index.min(STEPS - 1)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.0.iter()
    }
}

impl Index<usize> for GradientRamp {
    type Output = Color;

    fn index(&self, index: usize) -> &Color {
        &self.0[index]
    }
}

/// The two ramps the renderer reads: usage bars by clock frequency and the
/// thermometer by temperature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientTable {
    pub frequency:   GradientRamp,
    pub temperature: GradientRamp,
}

impl GradientTable {
    pub fn new(freq: (Color, Color), temp: (Color, Color)) -> Self {
        Self {
            frequency:   GradientRamp::new(freq.0, freq.1),
            temperature: GradientRamp::new(temp.0, temp.1),
        }
    }

    /// Recompute both ramps in full.
    pub fn rebuild(&mut self, freq: (Color, Color), temp: (Color, Color)) {
        *self = Self::new(freq, temp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        let ramp = GradientRamp::new(Color::BLACK, Color::WHITE);
        assert_eq!(ramp[0], Color::BLACK);
        assert_eq!(ramp[99], Color::WHITE);
    }

    #[test]
    fn channels_are_monotonic() {
        let ramp = GradientRamp::new(Color::GREEN, Color::RED);
        let pairs: Vec<_> = ramp.iter().zip(ramp.iter().skip(1)).collect();
        assert!(pairs.iter().all(|(a, b)| a.r <= b.r));
        assert!(pairs.iter().all(|(a, b)| a.g >= b.g));
        assert!(pairs.iter().all(|(a, b)| a.b == 0 && b.b == 0));
    }

    #[test]
    fn midpoint_is_integer_interpolation() {
        let ramp = GradientRamp::new(Color::BLACK, Color::new(99, 198, 0));
        assert_eq!(ramp[50], Color::new(50, 100, 0));
    }

    #[test]
    fn at_clamps_out_of_range() {
        let ramp = GradientRamp::new(Color::BLACK, Color::WHITE);
        assert_eq!(ramp.at(250), Color::WHITE);
    }

    #[test]
    fn rebuild_replaces_both_ramps() {
        let mut table = GradientTable::new((Color::GREEN, Color::RED), (Color::BLUE, Color::RED));
        table.rebuild((Color::BLACK, Color::WHITE), (Color::WHITE, Color::BLACK));
        assert_eq!(table.frequency[0], Color::BLACK);
        assert_eq!(table.temperature[0], Color::WHITE);
        assert_eq!(table.temperature[99], Color::BLACK);
    }
}
