//! Host sampling for the tray icon: CPU rates, clock frequency and
//! temperature, plus the smeared history the renderer draws.

pub mod cpu;
pub mod freq;
pub mod history;
pub mod source;
pub mod stat;
pub mod temperature;

pub use cpu::CpuRateSampler;
pub use freq::{Calibration, FreqPaths, FrequencyBounds, FrequencySampler};
pub use history::HistoryBuffer;
pub use source::{CounterSource, FileOpener, FileSource, SourceOpener};
pub use stat::{CounterSnapshot, StatParseError};
pub use temperature::{TemperatureSampler, ThermalPaths, ThermalState};

use tray_core::{Result, Sample};

/// What one tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// The sample just recorded at history index `0`.
    pub sample:   Sample,
    /// Raw current frequency for the tooltip, in kHz.
    pub freq_khz: u64,
    /// Tick counter after this tick; the first tick is `1`.
    pub tick:     u64,
}

/// Owns the samplers and the history they feed.
///
/// Ticks must be serialised by the caller; [`Monitor::resize`] may only be
/// called between ticks.
pub struct Monitor<S = FileSource, O: SourceOpener = FileOpener> {
    cpu:     CpuRateSampler<S>,
    freq:    FrequencySampler<O>,
    temp:    TemperatureSampler<O>,
    history: HistoryBuffer,
    scale:   u32,
    width:   usize,
    ticks:   u64,
}

impl Monitor {
    /// Open the real kernel sources.  Fails only if `/proc/stat` is unusable.
    pub fn open(scale: u32) -> Result<Self> {
        Self::new(
            CpuRateSampler::open()?,
            FrequencySampler::open(),
            TemperatureSampler::open(),
            scale,
        )
    }
}

impl<S: CounterSource, O: SourceOpener> Monitor<S, O> {
    /// Seed the CPU baseline and a one-column history.
    pub fn new(
        mut cpu: CpuRateSampler<S>,
        freq: FrequencySampler<O>,
        mut temp: TemperatureSampler<O>,
        scale: u32,
    ) -> Result<Self> {
        let seed = Sample {
            cpu: cpu.sample(scale)?,
            freq_ratio: 0,
            temp: temp.sample(),
        };

        Ok(Self {
            cpu,
            freq,
            temp,
            history: HistoryBuffer::seeded(seed),
            scale,
            width: 1,
            ticks: 0,
        })
    }

    /// One sampling period: smear the history and record a fresh sample.
    ///
    /// Only a CPU counter failure is an error; frequency and temperature
    /// degrade to `0`.
    pub fn tick(&mut self) -> Result<Reading> {
        self.ticks += 1;

        let cpu = self.cpu.sample(self.scale)?;
        let freq_khz = self.freq.sample();
        let sample = Sample {
            cpu,
            freq_ratio: self.freq.ratio(self.scale),
            temp: self.temp.sample(),
        };
        self.history.tick(sample);

        Ok(Reading {
            sample,
            freq_khz,
            tick: self.ticks,
        })
    }

    /// Set the render width, growing the history if needed.
    pub fn resize(&mut self, width: usize) {
        let width = width.max(1);
        self.history.resize(width);
        self.width = width;
    }

    /// The newest `width` entries, newest first.
    pub fn visible(&self) -> &[Sample] {
        let samples = self.history.samples();
        &samples[..self.width.min(samples.len())]
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn thermal_state(&self) -> ThermalState {
        self.temp.state()
    }

    pub fn frequency_bounds(&self) -> FrequencyBounds {
        self.freq.bounds()
    }
}
