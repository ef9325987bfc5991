use tray_core::Sample;

/// Per-tick samples, newest first, decaying into a smooth trail.
///
/// Index `0` is the most recent sample. On every tick each older entry is
/// blended toward its newer neighbour ("smeared") before the new sample
/// lands at index `0`, so older columns drift toward recent history
/// instead of scrolling away. The buffer only ever grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryBuffer {
    samples:  Vec<Sample>,
    capacity: usize,
}

impl HistoryBuffer {
    /// An empty buffer that fills up over `capacity` ticks.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// A full one-entry buffer.
    pub fn seeded(sample: Sample) -> Self {
        Self {
            samples:  vec![sample],
            capacity: 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Newest first.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.first()
    }

    /// Grow to `width` entries by repeating the oldest one.  Never shrinks.
    pub fn resize(&mut self, width: usize) {
        if width <= self.capacity {
            return;
        }
        self.capacity = width;
        if let Some(&oldest) = self.samples.last() {
            self.samples.resize(width, oldest);
        } else {
            self.samples.reserve(width);
        }
    }

    /// Smear the existing entries, then record `sample` as the newest.
    pub fn tick(&mut self, sample: Sample) {
        self.smear();
        if self.samples.len() < self.capacity {
            self.samples.insert(0, sample);
        } else {
            self.samples[0] = sample;
        }
    }

    /// Blend entry `i` toward entry `i - 1` with weight `1 / 2i`, oldest
    /// first so each entry sees its neighbour's pre-tick value.
    fn smear(&mut self) {
        for i in (1..self.samples.len()).rev() {
            let newer = self.samples[i - 1];
            let entry = &mut self.samples[i];
            entry.cpu.usage = smear(entry.cpu.usage.into(), newer.cpu.usage.into(), i) as u32;
            entry.cpu.iowait = smear(entry.cpu.iowait.into(), newer.cpu.iowait.into(), i) as u32;
            entry.freq_ratio = smear(entry.freq_ratio.into(), newer.freq_ratio.into(), i) as u32;
            entry.temp = smear(entry.temp.into(), newer.temp.into(), i) as i32;
        }
    }
}

/// `(value * (2i - 1) + target) / 2i`, nudging `value` up by one first when
/// `target` is larger so rises catch up faster than falls.
fn smear(value: i64, target: i64, i: usize) -> i64 {
    let factor = 2 * i as i64;
    let value = if value < target { value + 1 } else { value };
    (value * (factor - 1) + target) / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use tray_core::CpuRate;

    fn sample(usage: u32, temp: i32) -> Sample {
        Sample {
            cpu:        CpuRate { usage, iowait: usage / 10 },
            freq_ratio: usage,
            temp,
        }
    }

    #[test]
    fn smear_weights_toward_newer() {
        assert_eq!(smear(0, 100, 1), 50);
        assert_eq!(smear(100, 0, 1), 50);
        assert_eq!(smear(100, 0, 2), 75);
        assert_eq!(smear(0, 100, 2), 25);
    }

    #[test]
    fn smear_catches_up_on_rises() {
        // 0 -> 1 at i = 3: (1 * 5 + 1) / 6 == 1, where plain flooring stays at 0.
        assert_eq!(smear(0, 1, 3), 1);
        assert_eq!(smear(1, 0, 3), 0);
        assert_eq!(smear(7, 7, 5), 7);
    }

    #[test]
    fn smear_stays_between_inputs() {
        for a in 0..=100 {
            for b in 0..=100 {
                for i in 1..8 {
                    let v = smear(a, b, i);
                    assert!(v >= a.min(b) && v <= a.max(b), "smear({a}, {b}, {i}) = {v}");
                }
            }
        }
    }

    #[test]
    fn fills_up_to_capacity() {
        let mut history = HistoryBuffer::new(4);
        for n in 1..=6 {
            history.tick(sample(n, 40));
            assert_eq!(history.len(), (n as usize).min(4));
        }
        assert_eq!(history.latest(), Some(&sample(6, 40)));
    }

    #[test]
    fn older_entries_are_smeared() {
        let mut history = HistoryBuffer::seeded(sample(0, 30));
        history.resize(3);
        history.tick(sample(100, 90));
        assert_eq!(history.samples()[0], sample(100, 90));
        assert_eq!(history.samples()[1], sample(0, 30));

        history.tick(sample(100, 90));
        // entry 1 moved halfway toward the previous newest.
        assert_eq!(history.samples()[1].cpu.usage, 50);
        assert_eq!(history.samples()[1].temp, 60);
        // entry 2 a quarter of the way toward entry 1's old value.
        assert_eq!(history.samples()[2].cpu.usage, 0);
        assert_eq!(history.samples()[2].temp, 30);
    }

    #[test]
    fn resize_pads_with_oldest() {
        let mut history = HistoryBuffer::new(3);
        history.tick(sample(10, 0));
        history.tick(sample(20, 0));
        history.tick(sample(30, 0));
        let before = history.samples().to_vec();

        history.resize(6);
        assert_eq!(history.len(), 6);
        assert_eq!(history.capacity(), 6);
        assert_eq!(&history.samples()[..3], &before[..]);
        assert!(history.samples()[3..].iter().all(|s| *s == before[2]));
    }

    #[test]
    fn resize_never_shrinks() {
        let mut history = HistoryBuffer::seeded(sample(10, 0));
        history.resize(5);
        let before = history.clone();
        history.resize(2);
        history.resize(5);
        assert_eq!(history, before);
    }

    #[test]
    fn values_never_leave_observed_range() {
        let mut history = HistoryBuffer::seeded(sample(0, 20));
        history.resize(16);
        for n in 0..200u32 {
            let usage = (n * 37) % 101;
            history.tick(sample(usage, 20 + (n % 70) as i32));
            for s in history.samples() {
                assert!(s.cpu.usage <= 100);
                assert!((20..=89).contains(&s.temp));
            }
        }
    }
}
