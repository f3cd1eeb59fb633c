use std::io::Write;

use ferrocast_core::{format_date, Envelope, ForecastReport};

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render<W: Write>(
    out: &mut W,
    envelope: &Envelope<ForecastReport>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            if pretty {
                serde_json::to_writer_pretty(&mut *out, envelope)?;
            } else {
                serde_json::to_writer(&mut *out, envelope)?;
            }
            writeln!(out)?;
        }
        OutputFormat::Table => render_table(out, envelope)?,
    }

    Ok(())
}

fn render_table<W: Write>(out: &mut W, envelope: &Envelope<ForecastReport>) -> Result<(), CliError> {
    writeln!(out, "request_id  : {}", envelope.meta.request_id)?;
    writeln!(out, "generated_at: {}", envelope.meta.generated_at)?;
    writeln!(out, "source      : {}", envelope.meta.source)?;
    writeln!(out, "latency_ms  : {}", envelope.meta.latency_ms)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    if let Some(report) = &envelope.data {
        render_report(out, report)?;
    }

    if !envelope.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            writeln!(out, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

fn render_report<W: Write>(out: &mut W, report: &ForecastReport) -> std::io::Result<()> {
    writeln!(out, "symbol      : {}", report.symbol)?;
    writeln!(out, "range       : {}", report.range)?;
    writeln!(out, "rows        : {}", report.record_count)?;

    writeln!(out)?;
    writeln!(out, "Raw data (first {} rows)", report.preview.len())?;
    writeln!(
        out,
        "{:<10}  {:>12}  {:>12}  {:>12}  {:>12}  {:>12}",
        "date", "open", "high", "low", "close", "volume"
    )?;
    for record in &report.preview {
        let volume = record
            .volume
            .map(|volume| volume.to_string())
            .unwrap_or_else(|| String::from("-"));
        writeln!(
            out,
            "{:<10}  {:>12.2}  {:>12.2}  {:>12.2}  {:>12.2}  {:>12}",
            format_date(record.date),
            record.open,
            record.high,
            record.low,
            record.close,
            volume
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Closing price : {}", report.price_verdict)?;
    writeln!(out, "Differenced   : {}", report.difference_verdict)?;

    writeln!(out)?;
    writeln!(out, "Forecast ({})", report.forecast.model.order)?;
    for point in &report.forecast.points {
        writeln!(out, "{:<10}  {:>12.2}", format_date(point.date), point.value)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", report.message())
}

#[cfg(test)]
mod tests {
    use ferrocast_core::{EnvelopeError, EnvelopeMeta, PipelineError, ProviderId, Stage, Symbol};

    use super::*;

    #[test]
    fn table_lists_errors() {
        let envelope: Envelope<ForecastReport> = Envelope::failure(
            EnvelopeMeta::new(ProviderId::Yahoo, 5),
            EnvelopeError::from(&PipelineError::NoData {
                symbol: Symbol::parse("ZZZZ").expect("symbol"),
            }),
        );

        let mut buffer = Vec::new();
        render(&mut buffer, &envelope, OutputFormat::Table, false).expect("render");
        let text = String::from_utf8(buffer).expect("utf8");

        assert!(text.contains("source      : yahoo"));
        assert!(text.contains("  - no_data: No data found! Please check ticker name."));
        assert!(!text.contains("Forecast generated successfully!"));
    }

    #[test]
    fn json_is_one_line_unless_pretty() {
        let envelope: Envelope<ForecastReport> = Envelope::failure(
            EnvelopeMeta::new(ProviderId::Synthetic, 1),
            EnvelopeError::from(&PipelineError::FitFailure {
                stage: Stage::Forecast,
                reason: String::from("degenerate input"),
            }),
        );

        let mut compact = Vec::new();
        render(&mut compact, &envelope, OutputFormat::Json, false).expect("render");
        assert_eq!(compact.iter().filter(|byte| **byte == b'\n').count(), 1);

        let mut pretty = Vec::new();
        render(&mut pretty, &envelope, OutputFormat::Json, true).expect("render");
        let value: serde_json::Value = serde_json::from_slice(&pretty).expect("json");
        assert_eq!(value["errors"][0]["code"], "fit_failure");
        assert_eq!(value["meta"]["source"], "synthetic");
    }
}
