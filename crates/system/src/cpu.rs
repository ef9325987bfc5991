use crate::{
    source::{CounterSource, FileSource},
    stat::CounterSnapshot,
};
use tray_core::{CpuRate, Result, TrayError};

/// Path of the kernel's cumulative CPU time table.
pub const PROC_STAT: &str = "/proc/stat";

/// Turns cumulative CPU counters into busy and iowait rates.
///
/// Each call reports the share of time since the *previous* call, so the
/// sampler keeps the last reading as its baseline. The first call only
/// seeds the baseline and reports a zero rate.
pub struct CpuRateSampler<S = FileSource> {
    source:   S,
    baseline: Baseline,
}

/// Reduced counters from the previous call.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Baseline {
    #[default]
    Unseeded,
    Seeded { busy: u64, iowait: u64, total: u64 },
}

impl CpuRateSampler<FileSource> {
    /// Open `/proc/stat`.  Failing here is fatal: there is no useful
    /// degraded mode without CPU usage.
    pub fn open() -> Result<Self> {
        FileSource::open(PROC_STAT)
            .map(Self::new)
            .map_err(|e| TrayError::source(PROC_STAT, e))
    }
}

impl<S: CounterSource> CpuRateSampler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            baseline: Baseline::Unseeded,
        }
    }

    /// Read the counters and return the rates since the last call, on
    /// `[0, scale]`.
    pub fn sample(&mut self, scale: u32) -> Result<CpuRate> {
        let snapshot = self.read()?;
        let (busy, iowait, total) = (snapshot.busy(), snapshot.iowait, snapshot.total());

        let rate = match self.baseline {
            Baseline::Unseeded => CpuRate::default(),
            Baseline::Seeded {
                busy: prev_busy,
                iowait: prev_iowait,
                total: prev_total,
            } => {
                let elapsed = total.saturating_sub(prev_total);
                CpuRate {
                    usage:  share(busy, prev_busy, elapsed, scale),
                    iowait: share(iowait, prev_iowait, elapsed, scale),
                }
            }
        };

        self.baseline = Baseline::Seeded { busy, iowait, total };
        Ok(rate)
    }

    fn read(&mut self) -> Result<CounterSnapshot> {
        let raw = self
            .source
            .read()
            .map_err(|e| TrayError::source(self.source.path(), e))?;
        raw.parse::<CounterSnapshot>()
            .map_err(|e| TrayError::Parse(format!("{}: {e}", self.source.path().display())))
    }
}

/// `scale * (now - prev) / elapsed`, or `0` if the counter did not advance
/// (including resets) or no time elapsed.
fn share(now: u64, prev: u64, elapsed: u64, scale: u32) -> u32 {
    if now <= prev || elapsed == 0 {
        return 0;
    }
    let value = u128::from(scale) * u128::from(now - prev) / u128::from(elapsed);
    value.min(u128::from(scale)) as u32
}
