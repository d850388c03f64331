//! Fake CPU usage meter

use rand::Rng;
use std::time::Duration;

/// Time between samples
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(2000);

const BAR_BLOCKS: u8 = 10;

/// A random usage figure between 20% and 99%, resampled every two seconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuMeter {
    usage: u8,
    since_sample: Duration,
}

impl CpuMeter {
    /// Takes the first sample
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            usage: sample(rng),
            since_sample: Duration::ZERO,
        }
    }

    /// Current usage percentage
    #[must_use]
    pub const fn usage(&self) -> u8 {
        self.usage
    }

    /// Advances the clock, resampling once per elapsed interval
    pub fn tick<R: Rng + ?Sized>(&mut self, delta: Duration, rng: &mut R) {
        self.since_sample = self.since_sample.saturating_add(delta);
        while self.since_sample >= SAMPLE_INTERVAL {
            self.since_sample -= SAMPLE_INTERVAL;
            self.usage = sample(rng);
        }
    }

    /// Ten-block bar, one block per started ten percent
    #[must_use]
    pub fn bar(&self) -> String {
        let full = (self.usage / 10).min(BAR_BLOCKS);
        let mut bar = "█".repeat(full as usize);
        bar.push_str(&"░".repeat((BAR_BLOCKS - full) as usize));
        bar
    }

    /// Meter text, e.g. `CPU: ███████░░░ 73%`
    #[must_use]
    pub fn label(&self) -> String {
        format!("CPU: {} {}%", self.bar(), self.usage)
    }
}

fn sample<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(20..100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_label_format() {
        let meter = CpuMeter {
            usage: 73,
            since_sample: Duration::ZERO,
        };
        assert_eq!(meter.label(), "CPU: ███████░░░ 73%");
    }

    #[test]
    fn test_resample_interval() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut meter = CpuMeter::new(&mut rng);
        let first = meter.clone();
        meter.tick(Duration::from_millis(1999), &mut rng);
        assert_eq!(meter.usage(), first.usage());
        meter.tick(Duration::from_millis(1), &mut rng);
        assert_eq!(meter.since_sample, Duration::ZERO);
    }

    proptest! {
        #[test]
        fn prop_usage_in_range(seed in any::<u64>(), steps in 1usize..20) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut meter = CpuMeter::new(&mut rng);
            for _ in 0..steps {
                meter.tick(SAMPLE_INTERVAL, &mut rng);
                prop_assert!((20..100).contains(&meter.usage()));
                prop_assert_eq!(meter.bar().chars().count(), 10);
            }
        }
    }
}
