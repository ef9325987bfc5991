use crate::source::{CounterSource, FileOpener, SourceOpener};
use std::path::PathBuf;
use tracing::{info, warn};

/// Thermal sensor locations, tried in order during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThermalPaths {
    /// sysfs zone reporting millidegrees (Linux 2.6.26 and later).
    pub sys_class: PathBuf,
    /// Legacy ACPI zones reporting `temperature: <n> C`.
    pub proc_acpi: Vec<PathBuf>,
}

impl Default for ThermalPaths {
    fn default() -> Self {
        Self {
            sys_class: PathBuf::from("/sys/class/thermal/thermal_zone0/temp"),
            proc_acpi: ["THM", "THM0", "THRM"]
                .iter()
                .map(|zone| PathBuf::from(format!("/proc/acpi/thermal_zone/{zone}/temperature")))
                .collect(),
        }
    }
}

/// Where readings come from.  Moves only forward, toward `Unavailable`.
pub enum ThermalSource<S> {
    Undiscovered,
    SysClass(S),
    ProcAcpi(S),
    Unavailable,
}

/// Payload-free view of [`ThermalSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermalState {
    Undiscovered,
    SysClass,
    ProcAcpi,
    Unavailable,
}

impl<S> ThermalSource<S> {
    pub fn state(&self) -> ThermalState {
        match self {
            Self::Undiscovered => ThermalState::Undiscovered,
            Self::SysClass(_) => ThermalState::SysClass,
            Self::ProcAcpi(_) => ThermalState::ProcAcpi,
            Self::Unavailable => ThermalState::Unavailable,
        }
    }
}

/// Reads the CPU temperature from the first usable sensor.
///
/// The sensor is discovered on the first call. Once discovery or any later
/// read fails the sampler is permanently unavailable and returns `0`
/// without further I/O.
pub struct TemperatureSampler<O: SourceOpener = FileOpener> {
    opener: O,
    paths:  ThermalPaths,
    source: ThermalSource<O::Source>,
}

impl TemperatureSampler<FileOpener> {
    pub fn open() -> Self {
        Self::new(FileOpener, ThermalPaths::default())
    }
}

impl<O: SourceOpener> TemperatureSampler<O> {
    pub fn new(opener: O, paths: ThermalPaths) -> Self {
        Self::with_source(opener, paths, ThermalSource::Undiscovered)
    }

    /// Start from a known state, skipping discovery.
    pub fn with_source(opener: O, paths: ThermalPaths, source: ThermalSource<O::Source>) -> Self {
        Self { opener, paths, source }
    }

    pub fn state(&self) -> ThermalState {
        self.source.state()
    }

    /// Degrees Celsius, or `0` when no reading is available.
    pub fn sample(&mut self) -> i32 {
        if let ThermalSource::Undiscovered = self.source {
            self.source = self.discover();
        }

        let reading = match &mut self.source {
            ThermalSource::Undiscovered | ThermalSource::Unavailable => return 0,
            ThermalSource::SysClass(source) => read_millidegrees(source),
            ThermalSource::ProcAcpi(source) => read_acpi(source),
        };

        reading.unwrap_or_else(|reason| {
            warn!("Can't read temperature: {reason}; disabling thermometer");
            self.source = ThermalSource::Unavailable;
            0
        })
    }

    fn discover(&self) -> ThermalSource<O::Source> {
        let ThermalPaths { sys_class, proc_acpi } = &self.paths;

        match self.opener.open(sys_class) {
            Ok(source) => {
                info!("Reading temperature from {}", sys_class.display());
                return ThermalSource::SysClass(source);
            }
            Err(e) => warn!("Can't open {}: {e}", sys_class.display()),
        }

        for path in proc_acpi {
            if let Ok(source) = self.opener.open(path) {
                info!("Reading temperature from {}", path.display());
                return ThermalSource::ProcAcpi(source);
            }
        }

        warn!("Can't open /proc/acpi/thermal_zone/THxx/temperature; no thermal sensor");
        ThermalSource::Unavailable
    }
}

fn read_millidegrees(source: &mut impl CounterSource) -> Result<i32, String> {
    let raw = source.read().map_err(|e| e.to_string())?;
    raw.trim()
        .parse::<i32>()
        .map(|milli| milli / 1000)
        .map_err(|e| format!("{}: {e}", source.path().display()))
}

fn read_acpi(source: &mut impl CounterSource) -> Result<i32, String> {
    let raw = source.read().map_err(|e| e.to_string())?;
    parse_acpi(&raw).ok_or_else(|| format!("{}: wrong format '{}'", source.path().display(), raw.trim()))
}

/// Parse `temperature: <n> C`; the unit suffix is not checked.
fn parse_acpi(raw: &str) -> Option<i32> {
    let rest = raw.trim_start().strip_prefix("temperature:")?.trim_start();
    let end = rest
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(rest.len(), |(i, _)| i);
    rest[..end].parse().ok()
}
