//! Numeric primitives shared by the detectors
//!
//! Every function here is total: degenerate input (empty slices, zero
//! variance) maps to a defined fallback instead of NaN or a panic.

/// Calculate the mean of a slice
///
/// Returns 0.0 for empty slices.
///
/// # Examples
///
/// ```rust
/// use opmode_core::stats::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
/// assert_eq!(mean(&[]), 0.0);
/// ```
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Calculate the population standard deviation (divides by `n`)
///
/// Returns 0.0 for slices with less than 2 elements.
///
/// # Examples
///
/// ```rust
/// use opmode_core::stats::population_std;
///
/// let sd = population_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
/// assert!((sd - 2.0).abs() < 1e-12);
/// assert_eq!(population_std(&[3.0]), 0.0);
/// ```
pub fn population_std(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    let variance: f64 = data
        .iter()
        .map(|&x| {
            let diff = x - m;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;
    variance.sqrt()
}

/// Ordinary least-squares slope of `values` against x = 0..n-1
///
/// x is centered at `(n - 1) / 2`. Returns 0.0 when fewer than two points
/// are given or the centered sum of squares vanishes.
///
/// # Examples
///
/// ```rust
/// use opmode_core::stats::linear_slope;
///
/// assert!((linear_slope(&[1.0, 3.0, 5.0, 7.0]) - 2.0).abs() < 1e-12);
/// assert_eq!(linear_slope(&[4.0]), 0.0);
/// ```
pub fn linear_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, &y)| {
            let dx = i as f64 - x_mean;
            (num + dx * (y - y_mean), den + dx * dx)
        });

    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// First differences `x[i] - x[i-1]`
pub fn first_differences(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Difference-based noise ratio
///
/// Ratio of `std(diff(residuals)) / sqrt(2)` to the raw standard deviation
/// of `residuals`. For white noise this sits near 1.0, for slow drift near 0.
/// A series with zero spread is reported as fully noisy (1.0).
pub fn noise_ratio(residuals: &[f64]) -> f64 {
    let std_total = population_std(residuals);
    if std_total == 0.0 {
        return 1.0;
    }

    let diff_std = population_std(&first_differences(residuals)) / std::f64::consts::SQRT_2;
    diff_std / std_total
}

/// Coefficient of variation `std / |mean|`, 0.0 when the mean is zero
pub fn coefficient_of_variation(mean: f64, std: f64) -> f64 {
    if mean != 0.0 {
        std / mean.abs()
    } else {
        0.0
    }
}

/// Finite values of a slice, in order
pub fn finite_values(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|x| x.is_finite()).collect()
}
