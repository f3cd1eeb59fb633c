//! Behaviour tests for a complete forecast run as a user experiences it.

use ferrocast_core::calendar::is_business_day;
use ferrocast_core::chart::{forecast_chart_svg, ChartConfig};
use ferrocast_core::pipeline::{PREVIEW_ROWS, SUCCESS_MESSAGE};
use ferrocast_core::{Envelope, EnvelopeMeta, ProviderId};
use ferrocast_tests::{pipeline, ForecastParams, SyntheticAdapter};

fn params(ticker: &str, start: &str, end: &str, horizon: usize) -> ForecastParams {
    ForecastParams::parse(ticker, start, end, horizon).expect("valid parameters")
}

// =============================================================================
// Journey: default form values
// =============================================================================

#[tokio::test]
async fn user_forecasting_toyota_with_defaults_gets_ten_business_days() {
    // Given: the default form values
    let source = SyntheticAdapter::default();
    let params = params("7203.T", "2024-01-01", "2025-11-01", 10);

    // When: the forecast runs
    let report = pipeline::run(&source, &params)
        .await
        .expect("synthetic history should forecast");

    // Then: ten forecast points follow the last observed close
    assert_eq!(report.message(), SUCCESS_MESSAGE);
    assert_eq!(report.forecast.len(), 10);
    let last_close = report.prices.last_date().expect("non-empty prices");
    let dates: Vec<_> = report.forecast.points.iter().map(|p| p.date).collect();
    assert!(dates[0] > last_close);
    assert!(dates.iter().all(|date| is_business_day(*date)));
    assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));

    // And: every forecast value is a finite price
    assert!(report.forecast.values().iter().all(|v| v.is_finite()));
}

#[tokio::test]
async fn user_sees_a_preview_and_both_stationarity_verdicts() {
    // Given: a long synthetic history
    let source = SyntheticAdapter::default();

    // When: the forecast runs
    let report = pipeline::run(&source, &params("7203.T", "2024-01-01", "2025-11-01", 10))
        .await
        .expect("report");

    // Then: the preview holds the earliest rows in date order
    assert_eq!(report.preview.len(), PREVIEW_ROWS);
    assert_eq!(
        report.preview[0].date,
        report.prices.first_date().expect("prices")
    );
    assert!(report.preview.windows(2).all(|pair| pair[0].date < pair[1].date));

    // And: both verdicts carry a readable message and a probability
    for verdict in [&report.price_verdict, &report.difference_verdict] {
        assert!(verdict.message().starts_with("The series is"));
        assert!((0.0..=1.0).contains(&verdict.p_value));
    }

    // And: differencing leaves a stationary series
    assert!(report.difference_verdict.stationary);
}

#[tokio::test]
async fn horizon_bounds_are_both_usable() {
    // Given: the smallest and largest allowed horizons
    let source = SyntheticAdapter::default();

    for horizon in [5, 60] {
        // When: the forecast runs
        let report = pipeline::run(&source, &params("AAPL", "2023-01-01", "2024-01-01", horizon))
            .await
            .expect("report");

        // Then: exactly that many points come back
        assert_eq!(report.forecast.len(), horizon);
    }
}

// =============================================================================
// Journey: repeatability
// =============================================================================

#[tokio::test]
async fn identical_requests_give_identical_reports() {
    // Given: one set of parameters
    let source = SyntheticAdapter::default();
    let params = params("7203.T", "2024-01-01", "2025-11-01", 15);

    // When: the user submits twice
    let first = pipeline::run(&source, &params).await.expect("first");
    let second = pipeline::run(&source, &params).await.expect("second");

    // Then: nothing carried over between the runs changes the answer
    assert_eq!(first, second);
}

// =============================================================================
// Journey: presentation
// =============================================================================

#[tokio::test]
async fn chart_and_envelope_describe_the_same_run() {
    // Given: a finished report
    let source = SyntheticAdapter::default();
    let report = pipeline::run(&source, &params("MSFT", "2024-01-01", "2024-12-31", 10))
        .await
        .expect("report");

    // When: it is rendered as a chart and wrapped in an envelope
    let svg = forecast_chart_svg(&report.prices, &report.forecast, &ChartConfig::default());
    let envelope = Envelope::success(EnvelopeMeta::new(ProviderId::Synthetic, 1), report);
    let json = serde_json::to_value(&envelope).expect("serialize");

    // Then: the chart shows actual and predicted lines
    assert_eq!(svg.matches("<polyline").count(), 2);
    assert!(svg.contains("Predicted Price"));

    // And: the JSON carries the forecast points and no errors
    assert_eq!(json["data"]["forecast"]["points"].as_array().map(Vec::len), Some(10));
    assert!(json.get("errors").is_none());
    assert_eq!(json["meta"]["source"], "synthetic");
}
