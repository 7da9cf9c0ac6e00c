//! Summary statistics over whole runs.

use crate::types::{LinkResults, NodeResults, RunStats, SeriesMap, Stat};

impl Stat {
    /// Min, mean, and max of a sequence of values; all zero when empty.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Self {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        if count == 0 {
            return Stat::default();
        }
        Stat {
            min,
            avg: sum / count as f64,
            max,
        }
    }
}

fn all_values(series: &SeriesMap) -> impl Iterator<Item = f64> + '_ {
    series.values().flat_map(|s| s.iter().copied())
}

impl RunStats {
    pub fn compute(nodes: &NodeResults, links: &LinkResults, duration_hours: u32) -> Self {
        Self {
            pressure: Stat::of(all_values(&nodes.pressure)),
            flow: Stat::of(all_values(&links.flow).map(f64::abs)),
            velocity: Stat::of(all_values(&links.velocity)),
            duration_hours,
        }
    }
}
