//! Histogram and statistics computations over pixel data.

use std::collections::BTreeMap;

/// Default number of histogram bins.
pub const DEFAULT_BINS: usize = 256;

/// Summary statistics of a data array.
///
/// Every value is `None` when the data is empty.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Statistics {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub rms: Option<f64>,
    pub sum: Option<f64>,
}

impl Statistics {
    /// The statistics keyed by name, in name order.
    pub fn named(&self) -> BTreeMap<&'static str, Option<f64>> {
        BTreeMap::from([
            ("max", self.max),
            ("mean", self.mean),
            ("min", self.min),
            ("rms", self.rms),
            ("std", self.std),
            ("sum", self.sum),
        ])
    }
}

/// Compute statistics of `values`, ignoring non-finite entries.
pub fn compute_statistics(values: &[f64]) -> Statistics {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut sum_squares = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for &value in values.iter().filter(|v| v.is_finite()) {
        count += 1;
        sum += value;
        sum_squares += value * value;
        min = min.min(value);
        max = max.max(value);
    }

    if count == 0 {
        return Statistics::default();
    }

    let n = count as f64;
    let mean = sum / n;
    let variance = values
        .iter()
        .filter(|v| v.is_finite())
        .map(|&v| (v - mean) * (v - mean))
        .sum::<f64>()
        / n;

    Statistics {
        mean: Some(mean),
        std: Some(variance.sqrt()),
        min: Some(min),
        max: Some(max),
        rms: Some((sum_squares / n).sqrt()),
        sum: Some(sum),
    }
}

/// Bin `values` over `range` into `bins` bins, normalized so the fullest bin
/// is `1.0`.
///
/// Values outside `range` are not counted; the upper bound falls into the
/// last bin. When the range is degenerate every in-range value lands in the
/// middle bin. Returns an empty vector for empty data or zero bins.
pub fn compute_histogram(values: &[f64], bins: usize, range: (f64, f64)) -> Vec<f64> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (lower, upper) = range;
    let mut counts = vec![0u64; bins];
    let span = upper - lower;

    for &value in values.iter().filter(|v| v.is_finite()) {
        if value < lower || value > upper {
            continue;
        }
        let bin = if span > 0.0 {
            (((value - lower) / span * bins as f64) as usize).min(bins - 1)
        } else {
            bins / 2
        };
        counts[bin] += 1;
    }

    let peak = counts.iter().copied().max().unwrap_or(0);
    if peak == 0 {
        return vec![0.0; bins];
    }
    counts
        .into_iter()
        .map(|count| count as f64 / peak as f64)
        .collect()
}
