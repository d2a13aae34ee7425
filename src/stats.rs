//! Descriptive statistics over numeric samples.
//!
//! All functions in this module return `None` for input outside their
//! domain (an empty sample, non-finite values) instead of panicking.
//!
//! # Algorithms
//!
//! - **Mean**: Kahan compensated summation for O(ε) error independent of n.
//! - **Variance**: two-pass population variance, the mean of the squared
//!   deviations from the mean. Divides by `n`, not `n − 1`; use
//!   [`sample_variance`] for the Bessel-corrected estimator.

/// Computes the arithmetic mean using Kahan compensated summation.
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Returns
/// - `None` if `data` is empty or contains any NaN/Inf.
///
/// # Examples
/// ```
/// use u_stats::stats::mean;
/// let v = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert!((mean(&v).unwrap() - 3.0).abs() < 1e-15);
/// assert_eq!(mean(&[]), None);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    if !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(kahan_sum(data) / data.len() as f64)
}

/// Computes the population variance of `data`.
///
/// # Algorithm
/// ```text
/// m   = mean(x)
/// Var = mean((xᵢ − m)²)
/// ```
/// Both passes use compensated summation. Subtracting the mean first
/// avoids the catastrophic cancellation of the one-pass
/// `E[X²] − (E[X])²` formula.
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Returns
/// - `None` if `data` is empty or contains NaN/Inf.
/// - `Some(+∞)` if a squared deviation overflows, e.g. `[1e200, −1e200]`.
///
/// # Examples
/// ```
/// use u_stats::stats::variance;
/// assert_eq!(variance(&[1.0, 2.0, 3.0, 4.0]), Some(1.25));
/// assert_eq!(variance(&[5.0]), Some(0.0));
/// assert_eq!(variance(&[]), None);
/// ```
pub fn variance(data: &[f64]) -> Option<f64> {
    let m = mean(data)?;
    let mut acc = CompensatedSum::new();
    for &x in data {
        let d = x - m;
        acc.add(d * d);
    }
    Some(acc.value() / data.len() as f64)
}

/// Computes the sample (unbiased) variance with Bessel's correction.
///
/// Equivalent to `variance(data) · n / (n − 1)`.
///
/// # Returns
/// - `None` if `data.len() < 2` or contains NaN/Inf.
///
/// # Examples
/// ```
/// use u_stats::stats::sample_variance;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((sample_variance(&v).unwrap() - 4.571428571428571).abs() < 1e-12);
/// ```
pub fn sample_variance(data: &[f64]) -> Option<f64> {
    let n = data.len();
    if n < 2 {
        return None;
    }
    variance(data).map(|v| v * n as f64 / (n - 1) as f64)
}

/// Computes the population standard deviation, `sqrt(variance(data))`.
///
/// # Returns
/// - `None` if `data` is empty or contains NaN/Inf.
pub fn standard_deviation(data: &[f64]) -> Option<f64> {
    variance(data).map(f64::sqrt)
}

/// Kahan–Babuška (Neumaier) compensated summation of a slice.
///
/// # Complexity
/// Time: O(n), Space: O(1)
pub fn kahan_sum(data: &[f64]) -> f64 {
    data.iter()
        .fold(CompensatedSum::new(), |mut acc, &x| {
            acc.add(x);
            acc
        })
        .value()
}

/// Running Kahan–Babuška (Neumaier) sum.
///
/// Tracks a compensation term so that the rounding error of the total
/// does not grow with the number of terms. Once the plain sum overflows
/// (or meets an infinite term) the compensation is meaningless and
/// [`value`](Self::value) reports the plain sum.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *ZAMM* 54(1).
///
/// # Examples
/// ```
/// use u_stats::stats::CompensatedSum;
/// let mut acc = CompensatedSum::new();
/// for &x in &[1.0, 1e100, 1.0, -1e100] {
///     acc.add(x);
/// }
/// assert_eq!(acc.value(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    pub fn value(&self) -> f64 {
        if self.sum.is_finite() {
            self.sum + self.compensation
        } else {
            self.sum
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- mean ---

    #[test]
    fn test_mean_basic() {
        assert!((mean(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap() - 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_mean_single() {
        assert_eq!(mean(&[42.0]), Some(42.0));
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_mean_non_finite() {
        assert_eq!(mean(&[1.0, f64::NAN, 3.0]), None);
        assert_eq!(mean(&[1.0, f64::INFINITY]), None);
    }

    // --- variance ---

    #[test]
    fn test_variance_reference_sample() {
        // mean 2.5; squared deviations 2.25, 0.25, 0.25, 2.25
        assert_eq!(variance(&[1.0, 2.0, 3.0, 4.0]), Some(1.25));
    }

    #[test]
    fn test_variance_single_is_zero() {
        assert_eq!(variance(&[5.0]), Some(0.0));
    }

    #[test]
    fn test_variance_empty() {
        assert_eq!(variance(&[]), None);
    }

    #[test]
    fn test_variance_divides_by_n() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((variance(&v).unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_variance_constant() {
        assert_eq!(variance(&[7.5; 10]), Some(0.0));
    }

    #[test]
    fn test_variance_with_duplicates_and_negatives() {
        // mean 0; squared deviations 1, 1, 4, 4
        assert_eq!(variance(&[-1.0, 1.0, -2.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_variance_large_offset() {
        // Same spread as [1, 2, 3, 4], shifted far from zero.
        let v = [1e9 + 1.0, 1e9 + 2.0, 1e9 + 3.0, 1e9 + 4.0];
        assert!((variance(&v).unwrap() - 1.25).abs() < 1e-6);
    }

    #[test]
    fn test_variance_non_finite() {
        assert_eq!(variance(&[1.0, f64::NAN]), None);
        assert_eq!(variance(&[f64::NEG_INFINITY, 1.0]), None);
    }

    #[test]
    fn test_variance_overflowing_deviations() {
        assert_eq!(variance(&[1e200, -1e200]), Some(f64::INFINITY));
        assert_eq!(variance(&[f64::MAX, -f64::MAX]), Some(f64::INFINITY));
        assert_eq!(standard_deviation(&[1e200, -1e200]), Some(f64::INFINITY));
    }

    #[test]
    fn test_variance_is_pure() {
        let v = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        assert_eq!(variance(&v), variance(&v));
    }

    // --- sample_variance / standard_deviation ---

    #[test]
    fn test_sample_variance_bessel() {
        assert!((sample_variance(&[1.0, 2.0, 3.0, 4.0]).unwrap() - 5.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_sample_variance_too_short() {
        assert_eq!(sample_variance(&[]), None);
        assert_eq!(sample_variance(&[1.0]), None);
    }

    #[test]
    fn test_standard_deviation() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((standard_deviation(&v).unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(standard_deviation(&[]), None);
    }

    // --- kahan_sum ---

    #[test]
    fn test_kahan_sum_basic() {
        assert_eq!(kahan_sum(&[1.0, 2.0, 3.0]), 6.0);
        assert_eq!(kahan_sum(&[]), 0.0);
    }

    #[test]
    fn test_kahan_sum_overflow() {
        assert_eq!(kahan_sum(&[f64::MAX, f64::MAX]), f64::INFINITY);
        assert_eq!(kahan_sum(&[1.0, f64::INFINITY, 2.0]), f64::INFINITY);
        assert!(kahan_sum(&[f64::INFINITY, f64::NEG_INFINITY]).is_nan());
    }

    #[test]
    fn test_compensated_sum_running() {
        let mut acc = CompensatedSum::new();
        assert_eq!(acc.value(), 0.0);
        for _ in 0..10 {
            acc.add(0.1);
        }
        assert_eq!(acc.value(), 1.0);
    }

    #[test]
    fn test_kahan_sum_precision() {
        // Naive summation loses the small terms entirely.
        let data = [1.0, 1e100, 1.0, -1e100];
        assert_eq!(kahan_sum(&data), 2.0);
    }
}
