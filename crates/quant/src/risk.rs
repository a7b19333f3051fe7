//! Risk and performance metrics.
//!
//! Free functions over return and price slices, plus
//! [`PerformanceSummary`], which bundles them for one closing-price history.

use serde::{Deserialize, Serialize};

use crate::stats;

/// Trading sessions per year used to annualise daily figures.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Calculate maximum drawdown from a price or equity curve.
///
/// Returns the largest peak-to-trough decline as a fraction of the peak.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let Some(&first) = equity_curve.first() else {
        return 0.0;
    };

    let mut max_dd: f64 = 0.0;
    let mut peak = first;

    for &value in equity_curve {
        if value > peak {
            peak = value;
        }
        let dd = if peak > 0.0 { (peak - value) / peak } else { 0.0 };
        max_dd = max_dd.max(dd);
    }

    max_dd
}

/// Calculate Sharpe ratio from returns.
///
/// # Arguments
/// * `returns` - Periodic returns
/// * `risk_free_rate` - Risk-free rate for the same period (e.g., daily)
/// * `periods_per_year` - Number of periods in a year (252 for daily, 12 for monthly)
///
/// Returns `None` with fewer than two returns or zero volatility.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, periods_per_year: f64) -> Option<f64> {
    let mean_return = stats::mean(returns)?;
    let std = stats::sample_std_dev(returns)?;

    if std == 0.0 {
        return None;
    }

    let excess_return = mean_return - risk_free_rate;
    Some(excess_return / std * periods_per_year.sqrt())
}

/// Calculate historical Value at Risk using percentile method.
///
/// Returns the loss at the specified confidence level (as positive number).
pub fn historical_var(returns: &[f64], confidence: f64) -> Option<f64> {
    if returns.is_empty() || !(0.0..1.0).contains(&confidence) {
        return None;
    }

    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);

    let var = stats::percentile(&sorted, 1.0 - confidence)?;
    Some(-var.min(0.0))
}

/// Calculate annualized volatility from returns.
pub fn annualized_volatility(returns: &[f64], periods_per_year: f64) -> Option<f64> {
    let std = stats::sample_std_dev(returns)?;
    Some(std * periods_per_year.sqrt())
}

// =============================================================================
// Performance Summary
// =============================================================================

/// Historical performance of one closing-price series.
///
/// Ratios are fractions (0.12 = 12%) except the `_pct` fields.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Close-to-close change over the whole history, in percent.
    pub total_return_pct: Option<f64>,
    /// Sample std of daily returns scaled by sqrt(252).
    pub annualized_volatility: Option<f64>,
    /// Annualised Sharpe ratio with a zero risk-free rate.
    pub sharpe_ratio: Option<f64>,
    /// Largest peak-to-trough decline.
    pub max_drawdown: f64,
    /// One-day 95% historical Value at Risk.
    pub var_95: Option<f64>,
    /// Best single-bar return, in percent.
    pub best_return_pct: Option<f64>,
    /// Worst single-bar return, in percent.
    pub worst_return_pct: Option<f64>,
}

impl PerformanceSummary {
    /// Summarise a closing-price history, oldest first.
    pub fn from_closes(closes: &[f64]) -> Self {
        let daily = stats::returns(closes);
        let total_return_pct = match (closes.first(), closes.last()) {
            (Some(&first), Some(&last)) if closes.len() > 1 && first > 0.0 => {
                Some((last - first) / first * 100.0)
            }
            _ => None,
        };

        Self {
            total_return_pct,
            annualized_volatility: annualized_volatility(&daily, TRADING_DAYS_PER_YEAR),
            sharpe_ratio: sharpe_ratio(&daily, 0.0, TRADING_DAYS_PER_YEAR),
            max_drawdown: max_drawdown(closes),
            var_95: historical_var(&daily, 0.95),
            best_return_pct: daily.iter().copied().reduce(f64::max).map(|r| r * 100.0),
            worst_return_pct: daily.iter().copied().reduce(f64::min).map(|r| r * 100.0),
        }
    }
}
