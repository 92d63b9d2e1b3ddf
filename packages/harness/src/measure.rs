//! Adaptive timing of a repeated operation.
//!
//! The iteration count grows until one batch runs for at least the target time, the way Go's
//! `testing.B` picks `b.N`. Only the final batch is reported.

use std::{
    hint::black_box,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};

use crate::alloc::AllocSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureConfig {
    #[serde(with = "human_readable_duration")]
    pub target_time: Duration,
    pub min_iterations: u64,
    pub max_iterations: u64,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            target_time: Duration::from_secs(1),
            min_iterations: 1,
            max_iterations: 1_000_000_000,
        }
    }
}

impl MeasureConfig {
    fn first_batch(&self) -> u64 {
        self.min_iterations.clamp(1, self.max_iterations.max(1))
    }

    /// Size of the next batch given the size and duration of the previous one.
    ///
    /// Aims 20% past the target, grows at most 100x per step and always by at least one
    /// iteration, then clamps into `[min_iterations, max_iterations]`.
    pub fn next_batch(&self, previous: u64, elapsed: Duration) -> u64 {
        let goal = self.target_time.as_nanos().max(1);
        let elapsed = elapsed.as_nanos().max(1);
        let previous = u128::from(previous.max(1));

        let mut n = goal.saturating_mul(previous) / elapsed;
        n += n / 5;
        n = n.min(previous.saturating_mul(100));
        n = n.max(previous + 1);

        let n = u64::try_from(n).unwrap_or(u64::MAX);
        n.clamp(self.first_batch(), self.max_iterations.max(1))
    }
}

/// The final batch of a measured operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub iterations: u64,
    pub elapsed: Duration,
    pub allocs: u64,
    pub bytes: u64,
}

impl Measurement {
    pub fn ns_per_op(&self) -> f64 {
        self.elapsed.as_nanos() as f64 / self.iterations.max(1) as f64
    }

    pub fn allocs_per_op(&self) -> u64 {
        self.allocs / self.iterations.max(1)
    }

    pub fn bytes_per_op(&self) -> u64 {
        self.bytes / self.iterations.max(1)
    }
}

/// Repeats `op` in growing batches and returns the last batch together with the output of its
/// final iteration. The first error aborts the measurement.
pub fn run<T, E>(
    config: &MeasureConfig,
    mut op: impl FnMut() -> Result<T, E>,
) -> Result<(Measurement, T), E> {
    let mut n = config.first_batch();

    loop {
        let (measurement, output) = batch(n, &mut op)?;

        if measurement.elapsed >= config.target_time || n >= config.max_iterations {
            return Ok((measurement, output));
        }

        n = config.next_batch(n, measurement.elapsed);
    }
}

fn batch<T, E>(n: u64, op: &mut impl FnMut() -> Result<T, E>) -> Result<(Measurement, T), E> {
    let before = AllocSnapshot::take();
    let start = Instant::now();

    let mut output = black_box(op()?);
    for _ in 1..n {
        output = black_box(op()?);
    }

    let elapsed = start.elapsed();
    let after = AllocSnapshot::take();

    let measurement = Measurement {
        iterations: n,
        elapsed,
        allocs: after.allocs_since(&before),
        bytes: after.bytes_since(&before),
    };

    Ok((measurement, output))
}

/// `serde(with)` adapter reading and writing durations such as `"250ms"` or `"1s"`.
pub mod human_readable_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*duration))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let duration_str: String = Deserialize::deserialize(deserializer)?;
        humantime::parse_duration(&duration_str).map_err(|e| {
            let msg = format!("Failed to parse duration '{duration_str}': {e};");
            serde::de::Error::custom(msg)
        })
    }
}
