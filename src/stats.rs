//! Histogram summary of a finished run
//!
//! Reduces the bin tallies to the numbers worth logging: where the peak is,
//! the mean bin and spread, and each bin's share of the total.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSummary {
    pub total: u64,
    /// Fullest bin; ties go to the lowest index. `None` when nothing landed.
    pub peak_bin: Option<usize>,
    /// Mean bin index weighted by count
    pub mean: f64,
    pub std_dev: f64,
    /// Fraction of all balls per bin
    pub shares: Vec<f64>,
}

impl HistogramSummary {
    pub fn from_bins(bins: &[u32]) -> Self {
        let total: u64 = bins.iter().map(|&c| u64::from(c)).sum();

        let peak_bin = if total == 0 {
            None
        } else {
            let mut peak = 0;
            for (i, &c) in bins.iter().enumerate() {
                if c > bins[peak] {
                    peak = i;
                }
            }
            Some(peak)
        };

        let (mean, std_dev, shares) = if total == 0 {
            (0.0, 0.0, vec![0.0; bins.len()])
        } else {
            let n = total as f64;
            let mean = bins
                .iter()
                .enumerate()
                .map(|(i, &c)| i as f64 * c as f64)
                .sum::<f64>()
                / n;
            let variance = bins
                .iter()
                .enumerate()
                .map(|(i, &c)| (i as f64 - mean).powi(2) * c as f64)
                .sum::<f64>()
                / n;
            let shares = bins.iter().map(|&c| c as f64 / n).collect();
            (mean, variance.sqrt(), shares)
        };

        Self {
            total,
            peak_bin,
            mean,
            std_dev,
            shares,
        }
    }

    /// Counts rise (or stay flat) up to the peak and fall (or stay flat) after it
    pub fn is_unimodal(&self) -> bool {
        let Some(peak) = self.peak_bin else {
            return true;
        };
        let rising = self.shares[..=peak].windows(2).all(|w| w[0] <= w[1]);
        let falling = self.shares[peak..].windows(2).all(|w| w[0] >= w[1]);
        rising && falling
    }
}
