//! End-to-end analysis scenarios over hand-built price histories.

use analysis::{AnalysisConfig, AnalysisError, InMemorySource, ModelOutcome, StockAnalyzer};
use types::{Bar, CompanyAttributes, IndicatorKind, Period, Polarity, PriceSeries};

/// Daily bars closing at `start + step * i`.
fn linear_series(symbol: &str, n: usize, start: f64, step: f64) -> PriceSeries {
    let bars = (0..n)
        .map(|i| {
            let close = start + step * i as f64;
            let open = close - step / 2.0;
            Bar::new(i as i64 * 86_400_000, open, close + 1.0, close - 1.0, close, 1_000.0)
        })
        .collect();
    PriceSeries::new(symbol, bars).unwrap()
}

fn analyzer_with(series: PriceSeries) -> StockAnalyzer<InMemorySource> {
    let source = InMemorySource::new();
    source.insert(series, CompanyAttributes::default());
    StockAnalyzer::new(source, AnalysisConfig::new().n_trees(30))
}

#[test]
fn test_sixty_bar_uptrend() {
    let analyzer = analyzer_with(linear_series("UP", 60, 100.0, 1.0));
    let report = analyzer.analyze("UP", Period::OneYear).unwrap();

    let (bar, row) = report.analyzed.latest().unwrap();
    assert_eq!(bar.close, 159.0);

    // Mean of closes 140..=159
    assert!((row.sma_20.unwrap() - 149.5).abs() < 1e-9);
    assert!((row.rsi_14.unwrap() - 100.0).abs() < 1e-9);
    assert!(row.sma_50.is_some());
    assert!(row.macd_signal.is_some());

    let headline = report.headline().unwrap();
    assert_eq!(headline.polarity, Polarity::Bullish);
    assert!(report.insights.len() > 1);
    assert_eq!(report.metrics.above_sma_20, Some(true));
}

#[test]
fn test_bands_bracket_the_middle() {
    let analyzer = analyzer_with(linear_series("UP", 60, 100.0, 1.0));
    let report = analyzer.analyze("UP", Period::OneYear).unwrap();

    for row in report.analyzed.rows() {
        if let (Some(upper), Some(middle), Some(lower), Some(sma)) =
            (row.bb_upper, row.bb_middle, row.bb_lower, row.sma_20)
        {
            assert!(upper >= middle && middle >= lower);
            assert!((middle - sma).abs() < 1e-9);
        }
    }
}

#[test]
fn test_five_bar_series_is_headline_only() {
    let analyzer = analyzer_with(linear_series("TINY", 5, 20.0, 0.5));
    let report = analyzer.analyze("TINY", Period::OneMonth).unwrap();

    for kind in IndicatorKind::ALL {
        let column = report.analyzed.column(kind);
        assert!(column.iter().all(Option::is_none), "{} defined", kind.name());
    }
    assert_eq!(report.insights.len(), 1);
    assert_eq!(report.headline().unwrap().polarity, Polarity::Bullish);
    assert!(matches!(report.model, ModelOutcome::Unavailable { .. }));
    assert_eq!(report.metrics.rsi, None);
}

#[test]
fn test_forty_bar_trend_forecast() {
    let analyzer = analyzer_with(linear_series("LIN", 40, 100.0, 1.0));
    let report = analyzer.analyze("LIN", Period::OneYear).unwrap();

    let summary = report.model.summary().expect("40 bars leave 20 labelled rows");
    assert_eq!(summary.train_rows + summary.test_rows, 20);
    assert_eq!(summary.test_rows, 4);

    // Naive extrapolation of the trend is 140; tolerance is one step
    assert!(
        (summary.predicted_price - 140.0).abs() < 1.0,
        "predicted {}",
        summary.predicted_price
    );

    let total: f64 = summary.feature_importance.values().sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(summary.feature_importance.values().all(|v| *v >= 0.0));
    assert_eq!(summary.feature_importance.len(), 9);
}

#[test]
fn test_short_history_reports_unavailable_model() {
    let analyzer = analyzer_with(linear_series("SHORT", 30, 50.0, 0.25));
    let report = analyzer.analyze("SHORT", Period::OneYear).unwrap();

    match &report.model {
        ModelOutcome::Unavailable { reason } => assert!(reason.contains("10"), "{reason}"),
        ModelOutcome::Trained(_) => panic!("30 bars must not train a model"),
    }
    // Indicators still render
    assert!(report.analyzed.latest().unwrap().1.sma_20.is_some());
}

#[test]
fn test_configured_empty_forest_reports_unavailable() {
    let source = InMemorySource::new();
    source.insert(linear_series("NOTREES", 80, 30.0, 0.3), CompanyAttributes::default());
    let config = AnalysisConfig::from_json_str(r#"{"model":{"forest":{"n_trees":0}}}"#).unwrap();
    let report = StockAnalyzer::new(source, config).analyze("NOTREES", Period::OneYear).unwrap();

    match &report.model {
        ModelOutcome::Unavailable { reason } => assert!(reason.contains("no trees"), "{reason}"),
        ModelOutcome::Trained(_) => panic!("a forest without trees must not report a model"),
    }
}

#[test]
fn test_negative_band_width_keeps_band_order() {
    let bars = (0..60)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.5).sin() * 10.0;
            Bar::new(i as i64 * 86_400_000, close, close + 1.0, close - 1.0, close, 1_000.0)
        })
        .collect();
    let source = InMemorySource::new();
    source.insert(PriceSeries::new("WAVY", bars).unwrap(), CompanyAttributes::default());
    let config = AnalysisConfig::from_json_str(r#"{"indicators":{"bollinger_k":-2.0}}"#).unwrap();
    let report = StockAnalyzer::new(source, config).analyze("WAVY", Period::OneYear).unwrap();

    let mut checked = 0;
    for row in report.analyzed.rows() {
        if let (Some(upper), Some(sma), Some(lower)) = (row.bb_upper, row.sma_20, row.bb_lower) {
            assert!(upper >= sma && sma >= lower, "{upper} {sma} {lower}");
            checked += 1;
        }
    }
    assert_eq!(checked, 41);
}

#[test]
fn test_empty_series_is_fatal() {
    let analyzer = analyzer_with(PriceSeries::new("NONE", vec![]).unwrap());
    let err = analyzer.analyze("NONE", Period::OneYear).unwrap_err();
    assert!(matches!(err, AnalysisError::EmptySeries(ref s) if s == "NONE"));
}

#[test]
fn test_unknown_symbol_is_a_source_error() {
    let analyzer = analyzer_with(linear_series("KNOWN", 10, 10.0, 1.0));
    let err = analyzer.analyze("OTHER", Period::OneYear).unwrap_err();
    assert!(matches!(err, AnalysisError::DataSource(_)));
}

#[test]
fn test_same_seed_same_forecast() {
    let series = linear_series("SEED", 80, 30.0, 0.3);
    let a = analyzer_with(series.clone()).analyze("SEED", Period::OneYear).unwrap();
    let b = analyzer_with(series).analyze("SEED", Period::OneYear).unwrap();
    assert_eq!(a.model, b.model);
}

#[test]
fn test_report_serializes() {
    let analyzer = analyzer_with(linear_series("JSON", 60, 100.0, 1.0));
    let report = analyzer.analyze("JSON", Period::OneYear).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["symbol"], "JSON");
    assert_eq!(json["period"], "1y");
    assert_eq!(json["model"]["status"], "trained");
    assert!(json["insights"].as_array().is_some_and(|a| !a.is_empty()));
}
