use serde::{Deserialize, Serialize};

/// Fixed range every rate and ratio is expressed in.
pub const SCALE: u32 = 100;

/// CPU busy and iowait time since the previous reading, on a `[0, scale]` range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuRate {
    pub usage:  u32,
    pub iowait: u32,
}

/// One tick's aggregate reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub cpu:        CpuRate,
    /// Position of the current clock between min and max, on `[0, scale]`.
    pub freq_ratio: u32,
    /// Degrees Celsius; `0` means no reading.
    pub temp:       i32,
}

impl Sample {
    /// Human-readable summary for a tooltip.
    ///
    /// `freq_khz` is the raw current frequency, shown in MHz.
    #[must_use]
    pub fn summary(&self, freq_khz: u64, scale: u32) -> String {
        let scale = scale.max(1);
        format!(
            "CPU {}% busy @ {} MHz, {}%wa\nTemperature: {} C",
            self.cpu.usage * 100 / scale,
            freq_khz / 1000,
            self.cpu.iowait * 100 / scale,
            self.temp,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_formats_percentages_and_mhz() {
        let sample = Sample {
            cpu:        CpuRate { usage: 50, iowait: 3 },
            freq_ratio: 50,
            temp:       47,
        };
        assert_eq!(
            sample.summary(1_600_000, SCALE),
            "CPU 50% busy @ 1600 MHz, 3%wa\nTemperature: 47 C"
        );
    }

    #[test]
    fn summary_rescales_to_percent() {
        let sample = Sample {
            cpu: CpuRate { usage: 500, iowait: 250 },
            ..Sample::default()
        };
        assert!(sample.summary(0, 1000).starts_with("CPU 50% busy @ 0 MHz, 25%wa"));
    }
}
