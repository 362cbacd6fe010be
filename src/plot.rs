//! Rolling-average quality plots over capture time.
//!
//! Charts are drawn with the plotters bitmap backend into an RGB buffer and
//! encoded by [`crate::output::save_rgb`], so the output format follows the
//! file extension (`dss_plot.jpg` by default).

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, TimeDelta};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use crate::error::PlotError;
use crate::output::{self, DEFAULT_JPEG_QUALITY};
use crate::table::QualityTable;

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Rendering options.
#[derive(Clone, Debug)]
pub struct PlotConfig {
    /// Rolling-mean window in frames.
    pub window: usize,
    pub width: u32,
    pub height: u32,
    /// Label every Nth frame on the time axis.
    pub label_stride: usize,
    pub jpeg_quality: u8,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            window: 10,
            width: 1200,
            height: 900,
            label_stride: 100,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl PlotConfig {
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn with_label_stride(mut self, stride: usize) -> Self {
        self.label_stride = stride.max(1);
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}

/// Trailing rolling mean. The first `window - 1` positions, and any window
/// containing a missing value, yield `None`.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            values[i + 1 - window..=i]
                .iter()
                .try_fold(0.0, |acc, v| v.map(|v| acc + v))
                .map(|sum| sum / window as f64)
        })
        .collect()
}

/// Split a series into contiguous runs of present values; gaps break the line.
fn segments(x: &[f64], y: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (&xv, yv) in x.iter().zip(y) {
        match yv {
            Some(v) => current.push((xv, *v)),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn value_range(y: &[Option<f64>]) -> (f64, f64) {
    let (lo, hi) = y
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if lo == hi {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.05 };
        return (lo - pad, hi + pad);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

/// Time-sorted rolling series for the three panels.
pub struct PanelSeries {
    /// Capture time of the first frame; `x` is seconds since then.
    pub start: NaiveDateTime,
    pub x: Vec<f64>,
    pub quality: Vec<Option<f64>>,
    pub nstars: Vec<Option<f64>>,
    /// Sky background in percent.
    pub background_pct: Vec<Option<f64>>,
    /// Positions of the time-axis labels.
    pub ticks: Vec<f64>,
}

impl PanelSeries {
    pub fn from_table(table: &QualityTable, config: &PlotConfig) -> Result<Self, PlotError> {
        let mut sorted = table.clone();
        sorted.sort_by_datetime();
        let records = sorted.records();
        let first = records.first().ok_or(PlotError::Empty)?;
        let start = first.datetime;

        let x: Vec<f64> = records
            .iter()
            .map(|r| (r.datetime - start).num_seconds() as f64)
            .collect();

        let quality: Vec<_> = records.iter().map(|r| r.quality).collect();
        let nstars: Vec<_> = records.iter().map(|r| r.nstars.map(f64::from)).collect();
        let background: Vec<_> = records.iter().map(|r| r.background).collect();

        let ticks = x.iter().step_by(config.label_stride.max(1)).copied().collect();

        Ok(PanelSeries {
            start,
            quality: rolling_mean(&quality, config.window),
            nstars: rolling_mean(&nstars, config.window),
            background_pct: rolling_mean(&background, config.window)
                .into_iter()
                .map(|v| v.map(|v| v * 100.0))
                .collect(),
            x,
            ticks,
        })
    }

    fn x_range(&self) -> (f64, f64) {
        let lo = self.x.first().copied().unwrap_or(0.0);
        let hi = self.x.last().copied().unwrap_or(0.0);
        if hi > lo {
            (lo, hi)
        } else {
            (lo, lo + 1.0)
        }
    }

    fn time_label(&self, seconds: f64) -> String {
        (self.start + TimeDelta::seconds(seconds.round() as i64))
            .format("%H:%M")
            .to_string()
    }
}

fn draw_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Drawing(e.to_string())
}

fn draw_panel(
    area: &Panel<'_>,
    series: &PanelSeries,
    y: &[Option<f64>],
    y_desc: &str,
    show_time_labels: bool,
) -> Result<(), PlotError> {
    let (x_lo, x_hi) = series.x_range();
    let (y_lo, y_hi) = value_range(y);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(if show_time_labels { 40 } else { 5 })
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(draw_err)?;

    let no_label = |_: &f64| String::new();

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&no_label)
        .y_desc(y_desc)
        .label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(draw_err)?;

    // Time labels sit under the tick frames, not at the mesh's own key points.
    if show_time_labels {
        let (base_x, base_y) = area.get_base_pixel();
        let style = TextStyle::from(("sans-serif", 14).into_font())
            .pos(Pos::new(HPos::Center, VPos::Top));
        for &tick in &series.ticks {
            let (px, py) = chart.backend_coord(&(tick, y_lo));
            area.draw(&Text::new(
                series.time_label(tick),
                (px - base_x, py - base_y + 8),
                style.clone(),
            ))
            .map_err(draw_err)?;
        }
    }

    for segment in segments(&series.x, y) {
        chart
            .draw_series(LineSeries::new(segment, &BLUE))
            .map_err(draw_err)?;
    }

    Ok(())
}

fn render_to_buffer<F>(config: &PlotConfig, draw: F) -> Result<Vec<u8>, PlotError>
where
    F: FnOnce(&Panel<'_>) -> Result<(), PlotError>,
{
    let mut buffer = vec![0u8; config.width as usize * config.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (config.width, config.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        draw(&root)?;
        root.present().map_err(draw_err)?;
    }
    Ok(buffer)
}

/// Three stacked panels sharing the time axis: quality, star count, sky background %.
pub fn render_panels(table: &QualityTable, path: &Path, config: &PlotConfig) -> Result<()> {
    let series = PanelSeries::from_table(table, config)?;

    let buffer = render_to_buffer(config, |root| {
        let panels = root.split_evenly((3, 1));
        draw_panel(&panels[0], &series, &series.quality, "Quality", false)?;
        draw_panel(&panels[1], &series, &series.nstars, "#Stars", false)?;
        draw_panel(&panels[2], &series, &series.background_pct, "Sky background %", true)
    })?;

    output::save_rgb(buffer, config.width, config.height, path, config.jpeg_quality)
        .with_context(|| format!("Failed to save plot {}", path.display()))?;
    info!("Saved plot of {} frames to {}", series.x.len(), path.display());
    Ok(())
}

/// Single rolling-quality chart.
pub fn render_quality(table: &QualityTable, path: &Path, config: &PlotConfig) -> Result<()> {
    let series = PanelSeries::from_table(table, config)?;

    let buffer = render_to_buffer(config, |root| {
        draw_panel(root, &series, &series.quality, "Quality", true)
    })?;

    output::save_rgb(buffer, config.width, config.height, path, config.jpeg_quality)
        .with_context(|| format!("Failed to save plot {}", path.display()))?;
    info!("Saved quality plot of {} frames to {}", series.x.len(), path.display());
    Ok(())
}
