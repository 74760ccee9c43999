//! SVG chart rendering of a simulation run.
//!
//! Overlays the price path, the dashed VWAP curve and one red marker per
//! TWAP execution slice on a shared time axis.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::domain::error::TwapError;
use crate::domain::simulation::SimulationReport;
use crate::ports::report_port::ReportPort;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 600.0;
const PADDING: f64 = 70.0;
const GRID_LINES: usize = 5;

const PRICE_COLOR: &str = "#1f77b4";
const VWAP_COLOR: &str = "#ff7f0e";
const EXECUTION_COLOR: &str = "red";

pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SvgChartAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for SvgChartAdapter {
    fn write(&self, report: &SimulationReport, output_path: &Path) -> Result<(), TwapError> {
        fs::write(output_path, render_chart(report)).map_err(|e| TwapError::Export {
            path: output_path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "chart"
    }
}

/// Maps data coordinates onto the plot area.
struct Frame {
    t0: NaiveDateTime,
    span_secs: f64,
    min_price: f64,
    max_price: f64,
}

impl Frame {
    fn plot_width() -> f64 {
        WIDTH - 2.0 * PADDING
    }

    fn plot_height() -> f64 {
        HEIGHT - 2.0 * PADDING
    }

    fn x(&self, t: NaiveDateTime) -> f64 {
        if self.span_secs > 0.0 {
            PADDING + (t - self.t0).num_seconds() as f64 / self.span_secs * Self::plot_width()
        } else {
            PADDING + Self::plot_width() / 2.0
        }
    }

    fn y(&self, price: f64) -> f64 {
        let range = self.max_price - self.min_price;
        if range > 0.0 {
            HEIGHT - PADDING - (price - self.min_price) / range * Self::plot_height()
        } else {
            HEIGHT - PADDING - Self::plot_height() / 2.0
        }
    }
}

pub fn render_chart(report: &SimulationReport) -> String {
    let ticks = report.series.ticks();
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="sans-serif">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="18">TWAP Execution Simulation</text>"#,
        WIDTH / 2.0,
        PADDING / 2.0
    );

    let (Some(first), Some(last)) = (ticks.first(), ticks.last()) else {
        let _ = writeln!(svg, "</svg>");
        return svg;
    };

    let all_prices = ticks
        .iter()
        .map(|t| t.price)
        .chain(report.vwap.iter().copied())
        .chain(report.schedule.prices());
    let (min_price, max_price) = all_prices.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p), hi.max(p))
    });
    let frame = Frame {
        t0: first.timestamp,
        span_secs: (last.timestamp - first.timestamp).num_seconds() as f64,
        min_price,
        max_price,
    };

    write_grid(&mut svg, &frame, first.timestamp, last.timestamp);

    let price_points: Vec<String> = ticks
        .iter()
        .map(|t| format!("{:.1},{:.1}", frame.x(t.timestamp), frame.y(t.price)))
        .collect();
    let _ = writeln!(
        svg,
        r#"<polyline fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
        PRICE_COLOR,
        price_points.join(" ")
    );

    let vwap_points: Vec<String> = ticks
        .iter()
        .zip(&report.vwap)
        .map(|(t, v)| format!("{:.1},{:.1}", frame.x(t.timestamp), frame.y(*v)))
        .collect();
    let _ = writeln!(
        svg,
        r#"<polyline fill="none" stroke="{}" stroke-width="1.5" stroke-dasharray="6,4" points="{}"/>"#,
        VWAP_COLOR,
        vwap_points.join(" ")
    );

    for slice in &report.schedule.slices {
        let _ = writeln!(
            svg,
            r#"<circle cx="{:.1}" cy="{:.1}" r="4" fill="{}"/>"#,
            frame.x(slice.timestamp),
            frame.y(slice.price),
            EXECUTION_COLOR
        );
    }

    write_legend(&mut svg);
    let _ = writeln!(svg, "</svg>");
    svg
}

fn write_grid(svg: &mut String, frame: &Frame, start: NaiveDateTime, end: NaiveDateTime) {
    let left = PADDING;
    let right = WIDTH - PADDING;
    let top = PADDING;
    let bottom = HEIGHT - PADDING;

    for i in 0..=GRID_LINES {
        let frac = i as f64 / GRID_LINES as f64;

        let y = bottom - frac * Frame::plot_height();
        let price = frame.min_price + frac * (frame.max_price - frame.min_price);
        let _ = writeln!(
            svg,
            r##"<line x1="{left:.1}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}" stroke="#dddddd"/>"##
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{:.2}</text>"#,
            left - 6.0,
            y + 4.0,
            price
        );

        let x = left + frac * Frame::plot_width();
        let at = start + (end - start) * i as i32 / GRID_LINES as i32;
        let _ = writeln!(
            svg,
            r##"<line x1="{x:.1}" y1="{top:.1}" x2="{x:.1}" y2="{bottom:.1}" stroke="#dddddd"/>"##
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="11">{}</text>"#,
            x,
            bottom + 18.0,
            at.format("%m-%d %H:%M")
        );
    }

    let _ = writeln!(
        svg,
        r#"<line x1="{left:.1}" y1="{bottom:.1}" x2="{right:.1}" y2="{bottom:.1}" stroke="black"/>"#
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{left:.1}" y1="{top:.1}" x2="{left:.1}" y2="{bottom:.1}" stroke="black"/>"#
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="13">Time</text>"#,
        WIDTH / 2.0,
        HEIGHT - 20.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="20" y="{:.1}" text-anchor="middle" font-size="13" transform="rotate(-90 20 {:.1})">Price</text>"#,
        HEIGHT / 2.0,
        HEIGHT / 2.0
    );
}

fn write_legend(svg: &mut String) {
    let x = PADDING + 15.0;
    let y = PADDING + 15.0;
    let _ = writeln!(
        svg,
        r##"<rect x="{:.1}" y="{:.1}" width="150" height="66" fill="white" stroke="#999999"/>"##,
        x - 8.0,
        y - 12.0
    );
    let entries = [
        ("Price", PRICE_COLOR, ""),
        ("VWAP", VWAP_COLOR, r#" stroke-dasharray="6,4""#),
    ];
    for (row, (label, color, dash)) in entries.iter().enumerate() {
        let ly = y + row as f64 * 20.0;
        let _ = writeln!(
            svg,
            r#"<line x1="{:.1}" y1="{ly:.1}" x2="{:.1}" y2="{ly:.1}" stroke="{color}" stroke-width="2"{dash}/>"#,
            x,
            x + 24.0
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="12">{label}</text>"#,
            x + 32.0,
            ly + 4.0
        );
    }
    let ly = y + 40.0;
    let _ = writeln!(
        svg,
        r#"<circle cx="{:.1}" cy="{ly:.1}" r="4" fill="{}"/>"#,
        x + 12.0,
        EXECUTION_COLOR
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="12">TWAP Execution</text>"#,
        x + 32.0,
        ly + 4.0
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::SimulationConfig;
    use crate::domain::simulation::run_simulation;
    use tempfile::tempdir;

    fn sample_report() -> SimulationReport {
        run_simulation(&SimulationConfig::default()).unwrap()
    }

    #[test]
    fn chart_has_title_and_labels() {
        let svg = render_chart(&sample_report());
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("TWAP Execution Simulation"));
        assert!(svg.contains(">Time<"));
        assert!(svg.contains(">Price<"));
        assert!(svg.contains(">VWAP<"));
    }

    #[test]
    fn chart_has_one_marker_per_slice_plus_legend() {
        let report = sample_report();
        let svg = render_chart(&report);
        assert_eq!(
            svg.matches("<circle").count(),
            report.schedule.slices.len() + 1
        );
    }

    #[test]
    fn chart_has_price_and_dashed_vwap_lines() {
        let svg = render_chart(&sample_report());
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains(r#"stroke-dasharray="6,4" points="#));
    }

    #[test]
    fn chart_has_dimensions() {
        let svg = render_chart(&sample_report());
        assert!(svg.contains(r#"width="1000""#));
        assert!(svg.contains(r#"height="600""#));
    }

    #[test]
    fn markers_stay_inside_plot_area() {
        let report = sample_report();
        let svg = render_chart(&report);
        for line in svg.lines().filter(|l| l.starts_with("<circle")) {
            let cy: f64 = line
                .split("cy=\"")
                .nth(1)
                .and_then(|rest| rest.split('"').next())
                .unwrap()
                .parse()
                .unwrap();
            assert!(cy >= PADDING - 1e-6 && cy <= HEIGHT - PADDING + 1e-6);
        }
    }

    #[test]
    fn write_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        SvgChartAdapter::new().write(&sample_report(), &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("<polyline"));
    }

    #[test]
    fn write_to_missing_directory_is_export_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope").join("chart.svg");
        let err = SvgChartAdapter::new().write(&sample_report(), &path).unwrap_err();
        assert!(matches!(err, TwapError::Export { .. }));
    }
}
