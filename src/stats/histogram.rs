//! Win-rate distribution
//! Histogram with automatic bin width and a Gaussian kernel density curve
//! scaled to bin counts, so both can share one axis.

use super::calculator::StatsCalculator;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// Points sampled along the KDE curve.
const KDE_POINTS: usize = 200;

/// Upper bound on the number of bins, whatever the bin-width rule says.
const MAX_BINS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Histogram and density curve of one season's values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution {
    pub bins: Vec<HistogramBin>,
    /// `[x, y]` points of the density curve, in count units.
    pub kde: Vec<[f64; 2]>,
    pub sample_size: usize,
}

impl Distribution {
    pub fn from_values(values: &[f64]) -> Self {
        let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if values.is_empty() {
            return Self::default();
        }

        let bins = Self::histogram(&values);
        let bin_width = bins.first().map(HistogramBin::width).unwrap_or(1.0);
        let kde = Self::kde_curve(&values, bin_width);

        Self {
            bins,
            kde,
            sample_size: values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sample_size == 0
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// Equal-width bins spanning [min, max]; the last bin is closed.
    fn histogram(values: &[f64]) -> Vec<HistogramBin> {
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        if max - min <= f64::EPSILON {
            return vec![HistogramBin {
                start: min - 0.5,
                end: min + 0.5,
                count: values.len(),
            }];
        }

        let n_bins = Self::auto_bin_count(values, min, max);
        let width = (max - min) / n_bins as f64;
        let mut bins: Vec<HistogramBin> = (0..n_bins)
            .map(|i| HistogramBin {
                start: min + i as f64 * width,
                end: min + (i + 1) as f64 * width,
                count: 0,
            })
            .collect();

        for &v in values {
            let idx = (((v - min) / width).floor() as usize).min(n_bins - 1);
            bins[idx].count += 1;
        }

        bins
    }

    /// NumPy "auto": the smaller of the Freedman-Diaconis and Sturges widths.
    fn auto_bin_count(values: &[f64], min: f64, max: f64) -> usize {
        let n = values.len() as f64;
        let range = max - min;

        let sturges_width = range / (n.log2() + 1.0);

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let iqr = StatsCalculator::percentile(&sorted, 75.0) - StatsCalculator::percentile(&sorted, 25.0);
        let fd_width = 2.0 * iqr / n.cbrt();

        let width = if fd_width > 0.0 {
            fd_width.min(sturges_width)
        } else {
            sturges_width
        };

        ((range / width).ceil() as usize).clamp(1, MAX_BINS)
    }

    /// Gaussian KDE with Scott's bandwidth, scaled by `n * bin_width`.
    fn kde_curve(values: &[f64], bin_width: f64) -> Vec<[f64; 2]> {
        if values.len() < 2 {
            return Vec::new();
        }

        let std = Statistics::std_dev(values);
        let bandwidth = std * (values.len() as f64).powf(-0.2);
        if !(bandwidth.is_finite() && bandwidth > 0.0) {
            return Vec::new();
        }

        let kernels: Vec<Normal> = values
            .iter()
            .filter_map(|&v| Normal::new(v, bandwidth).ok())
            .collect();
        if kernels.is_empty() {
            return Vec::new();
        }

        let lo = Statistics::min(values) - 3.0 * bandwidth;
        let hi = Statistics::max(values) + 3.0 * bandwidth;
        let step = (hi - lo) / (KDE_POINTS - 1) as f64;
        let scale = bin_width / kernels.len() as f64 * values.len() as f64;

        (0..KDE_POINTS)
            .map(|i| {
                let x = lo + i as f64 * step;
                let density: f64 = kernels.iter().map(|k| k.pdf(x)).sum();
                [x, density * scale]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_cover_every_value() {
        let values = [0.1, 0.2, 0.25, 0.4, 0.5, 0.55, 0.6, 0.8, 0.9, 1.0];
        let dist = Distribution::from_values(&values);

        let total: usize = dist.bins.iter().map(|b| b.count).sum();
        assert_eq!(total, values.len());
        assert_eq!(dist.sample_size, values.len());
        assert!((dist.bins[0].start - 0.1).abs() < 1e-12);
        assert!((dist.bins.last().unwrap().end - 1.0).abs() < 1e-9);
    }

    #[test]
    fn freedman_diaconis_wins_for_long_tail() {
        // numpy.histogram_bin_edges(np.r_[np.arange(100), 1000], "auto") has 48 edges
        let mut values: Vec<f64> = (0..100).map(f64::from).collect();
        values.push(1000.0);

        assert_eq!(Distribution::auto_bin_count(&values, 0.0, 1000.0), 47);
        let dist = Distribution::from_values(&values);
        assert_eq!(dist.bins.len(), 47);
        assert_eq!(dist.bins.iter().map(|b| b.count).sum::<usize>(), 101);
    }

    #[test]
    fn sturges_used_when_iqr_is_zero() {
        // numpy.histogram_bin_edges([1] * 8 + [5], "auto") has 6 edges
        let mut values = vec![1.0; 8];
        values.push(5.0);

        assert_eq!(Distribution::auto_bin_count(&values, 1.0, 5.0), 5);
        let dist = Distribution::from_values(&values);
        assert_eq!(dist.bins.len(), 5);
        assert_eq!(dist.bins[0].count, 8);
        assert_eq!(dist.bins[4].count, 1);
    }

    #[test]
    fn constant_values_use_one_unit_bin() {
        let dist = Distribution::from_values(&[0.5, 0.5, 0.5]);
        assert_eq!(dist.bins.len(), 1);
        assert_eq!(dist.bins[0].count, 3);
        assert!((dist.bins[0].width() - 1.0).abs() < 1e-12);
        assert!(dist.kde.is_empty());
    }

    #[test]
    fn kde_area_matches_histogram_area() {
        let values: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin().abs()).collect();
        let dist = Distribution::from_values(&values);
        assert_eq!(dist.kde.len(), KDE_POINTS);

        let step = dist.kde[1][0] - dist.kde[0][0];
        let kde_area: f64 = dist.kde.iter().map(|p| p[1] * step).sum();
        let hist_area: f64 = dist.bins.iter().map(|b| b.count as f64 * b.width()).sum();
        assert!((kde_area - hist_area).abs() / hist_area < 0.02);
    }

    #[test]
    fn nan_values_are_dropped() {
        let dist = Distribution::from_values(&[f64::NAN, 0.3, 0.7]);
        assert_eq!(dist.sample_size, 2);
        assert!(Distribution::from_values(&[f64::NAN]).is_empty());
    }
}
