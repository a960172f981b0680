//! Power-law fits over shot-count sweeps.
//!
//! Fits `error_rate ≈ a · N^b` by least squares on `(ln N, ln error_rate)`.

use serde::{Deserialize, Serialize};

use crate::result::ExperimentResult;

/// Result of a log-log linear regression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerLawFit {
    /// Prefactor `a`.
    pub a: f64,
    /// Exponent `b`.
    pub b: f64,
    /// Coefficient of determination in log space.
    pub r_squared: f64,
    /// Points that entered the regression.
    pub points_used: usize,
}

impl PowerLawFit {
    /// Predicted error rate at `n`.
    pub fn predict(&self, n: f64) -> f64 {
        self.a * n.powf(self.b)
    }
}

/// Fit `y ≈ a · n^b` to `(n, y)` points.
///
/// Points with non-positive or non-finite coordinates are skipped. Returns
/// `None` unless at least two usable points with distinct `n` remain.
pub fn fit_power_law(points: &[(f64, f64)]) -> Option<PowerLawFit> {
    let logs: Vec<(f64, f64)> = points
        .iter()
        .filter(|(n, y)| n.is_finite() && y.is_finite() && *n > 0.0 && *y > 0.0)
        .map(|(n, y)| (n.ln(), y.ln()))
        .collect();

    if logs.len() < 2 {
        return None;
    }

    let count = logs.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for &(x, y) in &logs {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denom = count * sum_xx - sum_x * sum_x;
    if denom.abs() < 1e-12 {
        return None;
    }

    let b = (count * sum_xy - sum_x * sum_y) / denom;
    let ln_a = (sum_y - b * sum_x) / count;

    let mean_y = sum_y / count;
    let (ss_res, ss_tot) = logs.iter().fold((0.0, 0.0), |(res, tot), &(x, y)| {
        let predicted = ln_a + b * x;
        (res + (y - predicted).powi(2), tot + (y - mean_y).powi(2))
    });
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

    Some(PowerLawFit {
        a: ln_a.exp(),
        b,
        r_squared,
        points_used: logs.len(),
    })
}

/// Results of a fixed-noise sweep over shot counts, with one fit per
/// strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotSweepReport {
    pub noise_level: f64,
    pub points: Vec<ExperimentResult>,
    pub baseline: Option<PowerLawFit>,
    pub postselected: Option<PowerLawFit>,
    pub corrected: Option<PowerLawFit>,
}

impl ShotSweepReport {
    /// Fit each strategy over `points`.
    pub fn from_points(noise_level: f64, points: Vec<ExperimentResult>) -> Self {
        let fit_of = |rate: fn(&ExperimentResult) -> f64| {
            let data: Vec<(f64, f64)> = points
                .iter()
                .filter(|r| r.completed_trials > 0)
                .map(|r| (r.shots as f64, rate(r)))
                .collect();
            fit_power_law(&data)
        };

        Self {
            noise_level,
            baseline: fit_of(ExperimentResult::baseline_error_rate),
            postselected: fit_of(ExperimentResult::postselected_error_rate),
            corrected: fit_of(ExperimentResult::corrected_error_rate),
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_power_law_recovered() {
        let points: Vec<(f64, f64)> = [5.0, 10.0, 20.0, 40.0, 80.0]
            .iter()
            .map(|&n: &f64| (n, 0.8 * n.powf(-0.5)))
            .collect();
        let fit = fit_power_law(&points).unwrap();
        assert!((fit.a - 0.8).abs() < 1e-9);
        assert!((fit.b + 0.5).abs() < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
        assert_eq!(fit.points_used, 5);
        assert!((fit.predict(20.0) - 0.8 * 20f64.powf(-0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_error_points_skipped() {
        let fit = fit_power_law(&[(5.0, 0.0), (10.0, 0.2), (20.0, 0.1)]).unwrap();
        assert_eq!(fit.points_used, 2);
        assert!((fit.b + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(fit_power_law(&[]).is_none());
        assert!(fit_power_law(&[(10.0, 0.1)]).is_none());
        assert!(fit_power_law(&[(10.0, 0.1), (10.0, 0.2)]).is_none());
        assert!(fit_power_law(&[(10.0, 0.0), (20.0, -1.0)]).is_none());
    }

    #[test]
    fn test_flat_data_fits_with_zero_exponent() {
        let fit = fit_power_law(&[(5.0, 0.3), (50.0, 0.3)]).unwrap();
        assert!(fit.b.abs() < 1e-12);
        assert_eq!(fit.r_squared, 1.0);
    }
}
