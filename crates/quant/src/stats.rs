//! Statistical utilities for quantitative analysis.
//!
//! This module provides common statistical functions used across
//! indicator calculations, feature extraction and model scoring.

/// Calculate the mean of a slice of values.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn sum_sq_dev(values: &[f64]) -> Option<f64> {
    let mean_val = mean(values)?;
    Some(values.iter().map(|v| (v - mean_val).powi(2)).sum())
}

/// Calculate the sample variance (n-1 denominator).
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    Some(sum_sq_dev(values)? / (n - 1) as f64)
}

/// Calculate the sample standard deviation (n-1 denominator).
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Calculate returns from a price series.
/// Returns (price[i] - price[i-1]) / price[i-1] for each consecutive pair.
///
/// Pairs starting at a zero price are skipped.
pub fn returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Calculate percentile value from a sorted slice.
/// Percentile should be between 0.0 and 1.0 (e.g., 0.05 for the 5th percentile).
pub fn percentile(sorted_values: &[f64], pct: f64) -> Option<f64> {
    if sorted_values.is_empty() || !(0.0..=1.0).contains(&pct) {
        return None;
    }

    let n = sorted_values.len();
    let idx = pct * (n - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = (idx.ceil() as usize).min(n - 1);
    let frac = idx - lower as f64;

    Some(sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac)
}

/// Coefficient of determination of `predicted` against `actual`.
///
/// `1 - SS_res / SS_tot`. A constant `actual` gives 1.0 for a perfect fit
/// and 0.0 otherwise. Returns `None` for empty or mismatched inputs.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return None;
    }

    let ss_tot = sum_sq_dev(actual)?;
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return Some(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Some(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(3.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_sample_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // Sample variance: 32 / 7
        let sample = sample_variance(&values).unwrap();
        assert!((sample - 32.0 / 7.0).abs() < 1e-12);
        assert!(sample_std_dev(&[1.0]).is_none());
    }

    #[test]
    fn test_returns() {
        let prices = [100.0, 110.0, 99.0, 121.0];
        let rets = returns(&prices);
        assert_eq!(rets.len(), 3);
        assert!((rets[0] - 0.1).abs() < 0.0001); // 10% gain
        assert!((rets[1] - (-0.1)).abs() < 0.0001); // 10% loss
        assert!(returns(&[100.0]).is_empty());
    }

    #[test]
    fn test_percentile() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&sorted, 0.0), Some(1.0));
        assert_eq!(percentile(&sorted, 0.5), Some(3.0));
        assert_eq!(percentile(&sorted, 1.0), Some(5.0));
        assert!((percentile(&sorted, 0.125).unwrap() - 1.5).abs() < 1e-12);
        assert_eq!(percentile(&sorted, 1.5), None);
    }

    #[test]
    fn test_r2_score() {
        let actual = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(r2_score(&actual, &actual), Some(1.0));

        // Predicting the mean explains nothing
        let r2 = r2_score(&actual, &[2.5; 4]).unwrap();
        assert!(r2.abs() < 1e-12);

        // Worse than the mean goes negative
        assert!(r2_score(&actual, &[4.0, 3.0, 2.0, 1.0]).unwrap() < 0.0);
    }

    #[test]
    fn test_r2_score_constant_actual() {
        assert_eq!(r2_score(&[3.0, 3.0], &[3.0, 3.0]), Some(1.0));
        assert_eq!(r2_score(&[3.0, 3.0], &[3.0, 4.0]), Some(0.0));
        assert_eq!(r2_score(&[], &[]), None);
        assert_eq!(r2_score(&[1.0], &[1.0, 2.0]), None);
    }
}
