//! The aggregate `cpu` line of `/proc/stat`.
//!
//! See `proc_stat(5)` for more information.

use std::{num::ParseIntError, str::FromStr};
use thiserror::Error;

/// Cumulative time the system spent in each state, in `USER_HZ` ticks.
///
/// Kernels before 2.6 report only the first four fields; the rest read as
/// zero there.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CounterSnapshot {
    /// Time spent in user mode.
    pub user: u64,
    /// Time spent in user mode with low priority (nice).
    pub nice: u64,
    /// Time spent in system mode.
    pub system: u64,
    /// Time spent in the idle task.
    pub idle: u64,
    /// Time waiting for I/O to complete.
    ///
    /// This value is not reliable and may decrease in certain conditions.
    pub iowait: u64,
    /// Time servicing interrupts.
    pub irq: u64,
    /// Time servicing softirqs.
    pub softirq: u64,
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum StatParseError {
    #[error("no aggregate cpu line")]
    MissingCpuLine,
    #[error("cpu line has {found} fields, expected at least 4")]
    TooFewFields { found: usize },
    #[error("invalid time value: {0}")]
    Field(#[from] ParseIntError),
}

// === impl CounterSnapshot ===

impl CounterSnapshot {
    /// The number of leading fields this snapshot keeps.
    const FIELDS: usize = 7;
    /// Fields present on every kernel.
    const REQUIRED: usize = 4;

    /// Time doing anything other than idling or waiting on I/O.
    pub fn busy(&self) -> u64 {
        let Self {
            user,
            nice,
            system,
            irq,
            softirq,
            idle: _,
            iowait: _,
        } = *self;

        [nice, system, irq, softirq]
            .into_iter()
            .fold(user, u64::saturating_add)
    }

    pub fn total(&self) -> u64 {
        self.busy().saturating_add(self.idle).saturating_add(self.iowait)
    }
}

impl FromStr for CounterSnapshot {
    type Err = StatParseError;

    /// Parses the whole `/proc/stat` table, picking out the `cpu` line.
    fn from_str(stat: &str) -> Result<Self, Self::Err> {
        let fields = stat
            .lines()
            .map(|line| line.split_whitespace())
            .find_map(|mut tokens| (tokens.next() == Some("cpu")).then_some(tokens))
            .ok_or(StatParseError::MissingCpuLine)?
            .take(Self::FIELDS)
            .map(str::parse::<u64>)
            .collect::<Result<Vec<_>, _>>()?;

        if fields.len() < Self::REQUIRED {
            return Err(StatParseError::TooFewFields { found: fields.len() });
        }

        let field = |i: usize| fields.get(i).copied().unwrap_or(0);
        Ok(Self {
            user: field(0),
            nice: field(1),
            system: field(2),
            idle: field(3),
            iowait: field(4),
            irq: field(5),
            softirq: field(6),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The example provided in the `proc_stat(5)` man page.
    const EXAMPLE: &str = "\
cpu  10132153 290696 3084719 46828483 16683 0 25195 0 175628 0
cpu0 1393280 32966 572056 13343292 6130 0 17875 0 23933 0
page 5741 1808
intr 1462898
ctxt 115315
btime 769041601
processes 86031
procs_running 6
procs_blocked 2
";

    #[test]
    fn man_page_example() {
        let snapshot = EXAMPLE.parse::<CounterSnapshot>().unwrap();
        assert_eq!(
            snapshot,
            CounterSnapshot {
                user: 10132153,
                nice: 290696,
                system: 3084719,
                idle: 46828483,
                iowait: 16683,
                irq: 0,
                softirq: 25195,
            }
        );
        assert_eq!(snapshot.busy(), 10132153 + 290696 + 3084719 + 25195);
        assert_eq!(snapshot.total(), snapshot.busy() + 46828483 + 16683);
    }

    #[test]
    fn per_cpu_lines_are_skipped() {
        let stat = "cpu0 1 1 1 1 1 1 1\ncpu 2 2 2 2 2 2 2\n";
        let snapshot = stat.parse::<CounterSnapshot>().unwrap();
        assert_eq!(snapshot.user, 2);
    }

    #[test]
    fn old_kernels_report_four_fields() {
        let snapshot = "cpu 10 20 30 40\n".parse::<CounterSnapshot>().unwrap();
        assert_eq!(snapshot.idle, 40);
        assert_eq!(snapshot.iowait, 0);
        assert_eq!(snapshot.total(), 100);
    }

    #[test]
    fn missing_cpu_line() {
        let err = "page 5741 1808\n".parse::<CounterSnapshot>().unwrap_err();
        assert_eq!(err, StatParseError::MissingCpuLine);
    }

    #[test]
    fn too_few_fields() {
        let err = "cpu 1 2 3\n".parse::<CounterSnapshot>().unwrap_err();
        assert_eq!(err, StatParseError::TooFewFields { found: 3 });
    }

    #[test]
    fn bad_field() {
        let err = "cpu 1 2 x 4\n".parse::<CounterSnapshot>().unwrap_err();
        assert!(matches!(err, StatParseError::Field(_)));
    }

    #[test]
    fn big_counters() {
        let stat = "cpu  5000000000 5000000000 5000000000 5000000000 5000000000 5000000000 5000000000 0 0 0";
        let snapshot = stat.parse::<CounterSnapshot>().unwrap();
        assert_eq!(snapshot.total(), 35_000_000_000);
    }

    #[test]
    fn saturated_counters_do_not_overflow() {
        let max = u64::MAX;
        let stat = format!("cpu {max} {max} 0 {max} 0 0 0\n");
        let snapshot = stat.parse::<CounterSnapshot>().unwrap();
        assert_eq!(snapshot.busy(), u64::MAX);
        assert_eq!(snapshot.total(), u64::MAX);
    }
}
