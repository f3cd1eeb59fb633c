//! Static SVG line chart of actual closing prices against the forecast.

use std::fmt::Write;

use time::Date;

use crate::forecast::Forecast;
use crate::{format_date, Series};

const ACTUAL_COLOR: &str = "rgb(31,119,180)";
const FORECAST_COLOR: &str = "rgb(255,127,14)";
const Y_TICKS: usize = 5;
const X_TICKS: usize = 5;

/// Layout options for [`forecast_chart_svg`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub title: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 480,
            margin: 64,
            title: None,
        }
    }
}

impl ChartConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Render the actual series (solid) and forecast (dashed) on shared axes.
pub fn forecast_chart_svg(prices: &Series, forecast: &Forecast, config: &ChartConfig) -> String {
    let mut svg = String::new();
    match write_chart(&mut svg, prices, forecast, config) {
        Ok(()) => svg,
        Err(_) => String::from(r#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#),
    }
}

struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    min_day: i32,
    day_span: f64,
    min_price: f64,
    price_span: f64,
}

impl Frame {
    fn x(&self, date: Date) -> f64 {
        self.left + (date.to_julian_day() - self.min_day) as f64 / self.day_span * self.width
    }

    fn y(&self, price: f64) -> f64 {
        self.top + self.height - (price - self.min_price) / self.price_span * self.height
    }
}

fn write_chart(
    svg: &mut String,
    prices: &Series,
    forecast: &Forecast,
    config: &ChartConfig,
) -> std::fmt::Result {
    let points: Vec<(Date, f64)> = prices
        .observations()
        .iter()
        .map(|obs| (obs.date, obs.value))
        .collect();
    let predicted: Vec<(Date, f64)> = forecast
        .points
        .iter()
        .map(|point| (point.date, point.value))
        .collect();

    let (width, height, margin) = (config.width, config.height, config.margin);
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" font-family="sans-serif" font-size="12">"#
    )?;
    writeln!(svg, r#"  <rect width="100%" height="100%" fill="white"/>"#)?;

    let all: Vec<(Date, f64)> = points.iter().chain(predicted.iter()).copied().collect();
    let (Some(first), Some(last)) = (
        all.iter().map(|(date, _)| *date).min(),
        all.iter().map(|(date, _)| *date).max(),
    ) else {
        return writeln!(svg, "</svg>");
    };

    let min_price = all.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max_price = all.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let padding = ((max_price - min_price) * 0.05).max(f64::EPSILON.sqrt());

    let frame = Frame {
        left: f64::from(margin),
        top: f64::from(margin) / 2.0,
        width: f64::from(width.saturating_sub(margin + margin / 2)),
        height: f64::from(height.saturating_sub(margin + margin / 2)),
        min_day: first.to_julian_day(),
        day_span: f64::from((last.to_julian_day() - first.to_julian_day()).max(1)),
        min_price: min_price - padding,
        price_span: (max_price - min_price) + 2.0 * padding,
    };

    if let Some(title) = &config.title {
        writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16" font-weight="bold">{}</text>"#,
            f64::from(width) / 2.0,
            frame.top - 8.0,
            escape_xml(title)
        )?;
    }

    write_axes(svg, &frame, first, last)?;
    write_polyline(svg, &frame, &points, ACTUAL_COLOR, None)?;
    write_polyline(svg, &frame, &predicted, FORECAST_COLOR, Some("6 4"))?;
    write_legend(svg, &frame)?;

    writeln!(svg, "</svg>")
}

fn write_axes(svg: &mut String, frame: &Frame, first: Date, last: Date) -> std::fmt::Result {
    let bottom = frame.top + frame.height;
    let right = frame.left + frame.width;
    writeln!(
        svg,
        r#"  <line x1="{:.1}" y1="{bottom:.1}" x2="{right:.1}" y2="{bottom:.1}" stroke="black"/>"#,
        frame.left
    )?;
    writeln!(
        svg,
        r#"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{bottom:.1}" stroke="black"/>"#,
        frame.left, frame.top, frame.left
    )?;

    for tick in 0..Y_TICKS {
        let price = frame.min_price + frame.price_span * tick as f64 / (Y_TICKS - 1) as f64;
        let y = frame.y(price);
        writeln!(
            svg,
            r#"  <line x1="{:.1}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}" stroke="rgb(230,230,230)"/>"#,
            frame.left
        )?;
        writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="end">{price:.2}</text>"#,
            frame.left - 6.0,
            y + 4.0
        )?;
    }

    let span = last.to_julian_day() - first.to_julian_day();
    for tick in 0..X_TICKS {
        let offset = span * tick as i32 / (X_TICKS - 1) as i32;
        let Ok(date) = Date::from_julian_day(first.to_julian_day() + offset) else {
            continue;
        };
        writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            frame.x(date),
            bottom + 18.0,
            format_date(date)
        )?;
    }

    writeln!(
        svg,
        r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="14">Date</text>"#,
        frame.left + frame.width / 2.0,
        bottom + 40.0
    )?;
    writeln!(
        svg,
        r#"  <text x="16" y="{y:.1}" text-anchor="middle" font-size="14" transform="rotate(-90 16 {y:.1})">Price</text>"#,
        y = frame.top + frame.height / 2.0
    )
}

fn write_polyline(
    svg: &mut String,
    frame: &Frame,
    points: &[(Date, f64)],
    color: &str,
    dash: Option<&str>,
) -> std::fmt::Result {
    if points.is_empty() {
        return Ok(());
    }

    let mut coords = String::new();
    for (index, (date, value)) in points.iter().enumerate() {
        if index > 0 {
            coords.push(' ');
        }
        write!(coords, "{:.1},{:.1}", frame.x(*date), frame.y(*value))?;
    }

    let dash_attr = dash
        .map(|pattern| format!(r#" stroke-dasharray="{pattern}""#))
        .unwrap_or_default();
    writeln!(
        svg,
        r#"  <polyline points="{coords}" fill="none" stroke="{color}" stroke-width="1.5"{dash_attr}/>"#
    )
}

fn write_legend(svg: &mut String, frame: &Frame) -> std::fmt::Result {
    let x = frame.left + 12.0;
    let entries = [
        ("Actual Price", ACTUAL_COLOR, ""),
        ("Predicted Price", FORECAST_COLOR, r#" stroke-dasharray="6 4""#),
    ];
    for (row, (label, color, dash)) in entries.iter().enumerate() {
        let y = frame.top + 14.0 + row as f64 * 18.0;
        writeln!(
            svg,
            r#"  <line x1="{x:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{color}" stroke-width="2"{dash}/>"#,
            x + 24.0
        )?;
        writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}">{label}</text>"#,
            x + 30.0,
            y + 4.0
        )?;
    }
    Ok(())
}

pub(crate) fn escape_xml(input: &str) -> String {
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
