use crate::source::{CounterSource, FileOpener, SourceOpener};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// cpufreq attributes of the first core, in kHz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreqPaths {
    pub min: PathBuf,
    pub max: PathBuf,
    pub cur: PathBuf,
}

impl Default for FreqPaths {
    fn default() -> Self {
        let base = Path::new("/sys/devices/system/cpu/cpu0/cpufreq");
        Self {
            min: base.join("scaling_min_freq"),
            max: base.join("scaling_max_freq"),
            cur: base.join("scaling_cur_freq"),
        }
    }
}

/// Scaling range of the clock, in kHz.
///
/// `[0, 1]` is the degenerate "unknown" range: ratios against it are `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyBounds {
    pub min: u64,
    pub max: u64,
}

impl FrequencyBounds {
    pub const UNKNOWN: Self = Self { min: 0, max: 1 };

    pub fn is_valid(&self) -> bool {
        self.max > self.min
    }

    /// Where `freq` sits in the range, on `[0, scale]`.
    pub fn ratio(&self, freq: u64, scale: u32) -> u32 {
        if !self.is_valid() || freq <= self.min {
            return 0;
        }
        let value = u128::from(freq - self.min) * u128::from(scale)
            / u128::from(self.max - self.min);
        value.min(u128::from(scale)) as u32
    }
}

impl Default for FrequencyBounds {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

/// Calibration state of a [`FrequencySampler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Calibration {
    /// Bounds have not been read, or a failed read invalidated them.
    #[default]
    Pending,
    /// Bounds could not be read; the failure has already been reported.
    Inactive,
    /// Bounds are known; only the current frequency is read.
    Active,
}

/// Reads the current clock frequency against a lazily calibrated range.
///
/// Never fails: every error resolves to `0` and a log line. A failed
/// current-frequency read drops the calibration, so the next call reads
/// the bounds again.
pub struct FrequencySampler<O = FileOpener> {
    opener:  O,
    paths:   FreqPaths,
    state:   Calibration,
    bounds:  FrequencyBounds,
    current: u64,
}

impl FrequencySampler<FileOpener> {
    pub fn open() -> Self {
        Self::new(FileOpener, FreqPaths::default())
    }
}

impl<O: SourceOpener> FrequencySampler<O> {
    pub fn new(opener: O, paths: FreqPaths) -> Self {
        Self {
            opener,
            paths,
            state: Calibration::Pending,
            bounds: FrequencyBounds::UNKNOWN,
            current: 0,
        }
    }

    /// Current frequency in kHz, or `0` when it is unknown.
    pub fn sample(&mut self) -> u64 {
        if self.state != Calibration::Active && !self.calibrate() {
            return 0;
        }

        match read_khz(&self.opener, &self.paths.cur) {
            Ok(khz) => self.current = khz,
            Err(e) => {
                warn!("Can't get current processor frequency: {e}");
                self.reset(Calibration::Pending);
            }
        }
        self.current
    }

    /// The last sampled frequency against the calibrated range, on `[0, scale]`.
    pub fn ratio(&self, scale: u32) -> u32 {
        self.bounds.ratio(self.current, scale)
    }

    pub fn bounds(&self) -> FrequencyBounds {
        self.bounds
    }

    pub fn state(&self) -> Calibration {
        self.state
    }

    /// Reads min then max.  A missing max leaves it at `1`, which makes the
    /// range invalid and every ratio `0`, but current frequency is still
    /// reported.
    fn calibrate(&mut self) -> bool {
        let min = match read_khz(&self.opener, &self.paths.min) {
            Ok(min) => min,
            Err(e) => return self.fail(format!("Can't get scaling frequencies: {e}")),
        };

        let max = match self.opener.open(&self.paths.max) {
            Ok(mut source) => match parse_khz(&mut source) {
                Ok(max) => max,
                Err(e) => return self.fail(format!("Can't get max scaling frequency: {e}")),
            },
            Err(_) => FrequencyBounds::UNKNOWN.max,
        };

        let bounds = FrequencyBounds { min, max };
        if max != FrequencyBounds::UNKNOWN.max && !bounds.is_valid() {
            return self.fail(format!("Wrong scaling frequencies: min {min} >= max {max}"));
        }

        info!("CPU frequency range {min}..{max} kHz");
        self.bounds = bounds;
        self.state = Calibration::Active;
        true
    }

    /// Log (once per run of failures) and fall back to the unknown range.
    fn fail(&mut self, reason: String) -> bool {
        if self.state != Calibration::Inactive {
            warn!("{reason}");
        }
        self.reset(Calibration::Inactive);
        false
    }

    fn reset(&mut self, state: Calibration) {
        self.state = state;
        self.bounds = FrequencyBounds::UNKNOWN;
        self.current = 0;
    }
}

fn read_khz<O: SourceOpener>(opener: &O, path: &Path) -> std::io::Result<u64> {
    let mut source = opener.open(path)?;
    parse_khz(&mut source)
}

fn parse_khz(source: &mut impl CounterSource) -> std::io::Result<u64> {
    let raw = source.read()?;
    raw.trim()
        .parse::<u64>()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
