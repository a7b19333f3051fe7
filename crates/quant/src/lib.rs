//! Quantitative analysis crate for the stock analyzer.
//!
//! This crate computes technical indicators over a [`types::PriceSeries`],
//! plus the statistical and risk utilities the rest of the workspace uses.
//!
//! # Modules
//!
//! - [`indicators`] - Technical indicators (SMA, EMA, RSI, MACD, Bollinger, ATR)
//! - [`engine`] - [`IndicatorEngine`], one pass from series to indicator table
//! - [`risk`] - Risk and performance metrics (Sharpe, drawdown, VaR)
//! - [`stats`] - Statistical utilities
//!
//! # Example
//!
//! ```
//! use quant::IndicatorEngine;
//! use types::{Bar, PriceSeries};
//!
//! let bars = (0..30)
//!     .map(|i| {
//!         let c = 100.0 + i as f64;
//!         Bar::new(i, c, c + 1.0, c - 1.0, c, 1_000.0)
//!     })
//!     .collect();
//! let series = PriceSeries::new("DEMO", bars).unwrap();
//!
//! let analyzed = IndicatorEngine::default().compute(&series).unwrap();
//! let (_, latest) = analyzed.latest().unwrap();
//! assert!(latest.sma_20.is_some());
//! assert!(latest.sma_50.is_none());
//! ```
//!
//! # Design Notes
//!
//! - All indicator calculations use `f64`
//! - Rows whose lookback window is not yet full hold `None`, never zero
//! - Every value at row `i` uses only bars `0..=i`

pub mod engine;
pub mod error;
pub mod indicators;
pub mod risk;
pub mod stats;

pub use engine::{IndicatorConfig, IndicatorEngine};
pub use error::{IndicatorError, Result};
pub use indicators::RsiSmoothing;
pub use risk::PerformanceSummary;
