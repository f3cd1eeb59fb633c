use std::fs;
use std::time::Instant;

use ferrocast_core::chart::{forecast_chart_svg, ChartConfig};
use ferrocast_core::{
    pipeline, DataSource, Envelope, EnvelopeError, EnvelopeMeta, ForecastParams, ForecastReport,
};
use tracing::info;

use crate::cli::ForecastArgs;
use crate::error::CliError;

pub async fn run(
    args: &ForecastArgs,
    source: &dyn DataSource,
) -> Result<Envelope<ForecastReport>, CliError> {
    let params = ForecastParams::parse(&args.ticker, &args.start, &args.end, args.horizon)?;

    let started = Instant::now();
    let outcome = pipeline::run(source, &params).await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut meta = EnvelopeMeta::new(source.id(), latency_ms);

    let report = match outcome {
        Ok(report) => report,
        Err(error) => return Ok(Envelope::failure(meta, EnvelopeError::from(&error))),
    };

    if !report.difference_verdict.stationary {
        meta.push_warning("differenced series is still NOT stationary; d=1 may be too low");
    }

    if let Some(path) = &args.chart {
        let config = ChartConfig::default().with_title(format!(
            "{} closing price and {}-day forecast",
            report.symbol, report.horizon
        ));
        fs::write(path, forecast_chart_svg(&report.prices, &report.forecast, &config))?;
        info!(path = %path.display(), "chart written");
    }

    Ok(Envelope::success(meta, report))
}
