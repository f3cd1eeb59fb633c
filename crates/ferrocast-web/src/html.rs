//! Server-rendered pages for the browser form.

use std::fmt::Write;

use ferrocast_core::chart::{forecast_chart_svg, ChartConfig};
use ferrocast_core::pipeline::{DEFAULT_HORIZON, MAX_HORIZON, MIN_HORIZON};
use ferrocast_core::{format_date, ForecastReport, StationarityVerdict};

pub const DEFAULT_TICKER: &str = "7203.T";
pub const DEFAULT_START: &str = "2024-01-01";
pub const DEFAULT_END: &str = "2025-11-01";

/// Values shown in the input form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub ticker: String,
    pub start: String,
    pub end: String,
    pub horizon: String,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            ticker: DEFAULT_TICKER.to_owned(),
            start: DEFAULT_START.to_owned(),
            end: DEFAULT_END.to_owned(),
            horizon: DEFAULT_HORIZON.to_string(),
        }
    }
}

pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// The form alone.
pub fn index_page(values: &FormValues) -> String {
    layout(&form(values))
}

/// The form followed by an error banner.
pub fn error_page(values: &FormValues, message: &str) -> String {
    let mut body = form(values);
    let _ = write!(
        body,
        r#"<p class="error">{}</p>"#,
        escape(message)
    );
    layout(&body)
}

/// The form followed by every section of a successful run.
pub fn report_page(values: &FormValues, report: &ForecastReport, warnings: &[String]) -> String {
    let mut body = form(values);
    let _ = write_report(&mut body, report, warnings);
    layout(&body)
}

fn layout(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Stock Price Forecast</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
table {{ border-collapse: collapse; margin: 1rem 0; }}
th, td {{ border: 1px solid #ccc; padding: 0.25rem 0.5rem; text-align: right; }}
.success {{ color: #1a7f37; }}
.error {{ color: #cf222e; }}
.warning {{ color: #9a6700; }}
</style>
</head>
<body>
<h1>Stock Price Forecast</h1>
{body}
</body>
</html>
"#
    )
}

fn form(values: &FormValues) -> String {
    format!(
        r#"<form method="post" action="/forecast">
<label>Ticker <input type="text" name="ticker" value="{ticker}" required></label>
<label>Start date <input type="date" name="start" value="{start}" required></label>
<label>End date <input type="date" name="end" value="{end}" required></label>
<label>Forecast days <input type="number" name="horizon" value="{horizon}" min="{MIN_HORIZON}" max="{MAX_HORIZON}" required></label>
<button type="submit">Generate Forecast</button>
</form>
"#,
        ticker = escape(&values.ticker),
        start = escape(&values.start),
        end = escape(&values.end),
        horizon = escape(&values.horizon),
    )
}

fn write_report(
    body: &mut String,
    report: &ForecastReport,
    warnings: &[String],
) -> std::fmt::Result {
    writeln!(body, r#"<p class="success">{}</p>"#, escape(report.message()))?;
    for warning in warnings {
        writeln!(body, r#"<p class="warning">{}</p>"#, escape(warning))?;
    }

    writeln!(body, "<h2>Data preview</h2>")?;
    writeln!(
        body,
        "<table><tr><th>Date</th><th>Open</th><th>High</th><th>Low</th><th>Close</th><th>Volume</th></tr>"
    )?;
    for record in &report.preview {
        let volume = record.volume.map(|v| v.to_string()).unwrap_or_default();
        writeln!(
            body,
            "<tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td><td>{volume}</td></tr>",
            format_date(record.date),
            record.open,
            record.high,
            record.low,
            record.close
        )?;
    }
    writeln!(body, "</table>")?;

    writeln!(body, "<h2>Stationarity</h2>")?;
    write_verdict(body, "Closing price", &report.price_verdict)?;
    write_verdict(body, "Differenced price", &report.difference_verdict)?;

    writeln!(body, "<h2>Forecast chart</h2>")?;
    let config = ChartConfig::default().with_title(format!(
        "{} closing price and {}-day forecast",
        report.symbol, report.horizon
    ));
    body.push_str(&forecast_chart_svg(&report.prices, &report.forecast, &config));

    writeln!(body, "<h2>Forecast values</h2>")?;
    writeln!(body, "<table><tr><th>Date</th><th>Forecast</th></tr>")?;
    for point in &report.forecast.points {
        writeln!(
            body,
            "<tr><td>{}</td><td>{:.4}</td></tr>",
            format_date(point.date),
            point.value
        )?;
    }
    writeln!(body, "</table>")
}

fn write_verdict(body: &mut String, label: &str, verdict: &StationarityVerdict) -> std::fmt::Result {
    writeln!(body, "<p><strong>{label}:</strong> {}</p>", escape(&verdict.to_string()))
}
