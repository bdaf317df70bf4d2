//! Draws chart models with `plotters`.
//!
//! Charts are written as SVG. The drawing functions are generic over the
//! backend so tests can render into a string.

use super::chart::{BarChart, Chart, LineChart};
use super::errors::*;
use super::style::{Marker, Style};
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Scale of the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YScale {
    /// Values as they are.
    Linear,
    /// `sign(y) * log10(1 + |y|)`, defined at zero.
    Symlog,
}

impl Default for YScale {
    fn default() -> Self {
        YScale::Linear
    }
}

impl FromStr for YScale {
    type Err = Error;

    fn from_str(s: &str) -> Result<YScale> {
        match s {
            "linear" => Ok(YScale::Linear),
            "symlog" | "log" => Ok(YScale::Symlog),
            _ => bail!("unknown y scale '{}', expected linear, symlog or log", s),
        }
    }
}

impl YScale {
    /// Maps a data value to its plotted position.
    pub fn apply(self, y: f64) -> f64 {
        match self {
            YScale::Linear => y,
            YScale::Symlog => y.signum() * (1.0 + y.abs()).log10(),
        }
    }

    /// Maps a plotted position back to the data value.
    pub fn invert(self, y: f64) -> f64 {
        match self {
            YScale::Linear => y,
            YScale::Symlog => y.signum() * (10f64.powf(y.abs()) - 1.0),
        }
    }

    /// Tick label of a plotted position.
    pub fn label(self, y: f64) -> String {
        let v = self.invert(y);
        if v.abs() >= 10_000.0 {
            format!("{:.0e}", v)
        } else if v.fract().abs() < 1e-9 {
            format!("{:.0}", v)
        } else {
            format!("{:.2}", v)
        }
    }
}

/// User choices that apply to every chart of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    /// Title prefix, completed with ` - <dataset>`.
    pub title: Option<String>,

    /// Label of the x axis.
    pub x_label: String,

    /// Label of the y axis.
    pub y_label: String,

    /// Scale of the y axis.
    pub y_scale: YScale,

    /// Draw a legend.
    pub legend: bool,

    /// Width and height in pixels.
    pub size: (u32, u32),
}

impl Default for Axes {
    fn default() -> Self {
        Axes {
            title: None,
            x_label: "X".to_string(),
            y_label: "Y".to_string(),
            y_scale: YScale::Linear,
            legend: false,
            size: (640, 480),
        }
    }
}

fn render_err<E: fmt::Display>(e: E) -> Error {
    ErrorKind::Render(e.to_string()).into()
}

/// Range of the y axis for plotted values, always including zero.
fn y_bounds<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let hi = if hi > lo { hi * 1.05 } else { lo + 1.0 };
    (lo, hi)
}

/// Range of the bar y axis. Candidate counts start at one, so the axis does
/// too, and the top keeps a small headroom above the tallest bar.
fn bar_y_range(chart: &BarChart, scale: YScale) -> (f64, f64) {
    let lo = scale.apply(1.0);
    let hi = chart
        .bars
        .iter()
        .flat_map(|b| b.values.iter())
        .map(|&v| scale.apply(v))
        .filter(|v| v.is_finite())
        .fold(lo, f64::max);
    let hi = if hi > lo { lo + (hi - lo) * 1.05 } else { lo + 1.0 };
    (lo, hi)
}

fn caption(axes: &Axes, dataset: &str) -> Option<String> {
    axes.title
        .as_ref()
        .map(|t| format!("{} - {}", t, dataset))
}

/// Draws the runtime lines of `chart` onto `root`.
pub fn draw_lines<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &LineChart,
    axes: &Axes,
) -> Result<()> {
    let scale = axes.y_scale;
    root.fill(&WHITE).map_err(render_err)?;

    let xs = chart.thresholds.iter().map(|&t| t as f64).collect::<Vec<_>>();
    let x_lo = xs.iter().cloned().fold(::std::f64::INFINITY, f64::min);
    let x_hi = xs.iter().cloned().fold(::std::f64::NEG_INFINITY, f64::max);
    let (x_lo, x_hi) = if x_lo.is_finite() && x_hi > x_lo {
        (x_lo, x_hi)
    } else if x_lo.is_finite() {
        (x_lo - 1.0, x_lo + 1.0)
    } else {
        (0.0, 1.0)
    };
    let (y_lo, y_hi) = y_bounds(
        chart
            .lines
            .iter()
            .flat_map(|l| l.values.iter().map(move |&v| scale.apply(v))),
    );

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60);
    if let Some(text) = caption(axes, &chart.dataset) {
        builder.caption(text, ("sans-serif", 14));
    }
    let mut ctx = builder
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(render_err)?;

    ctx.configure_mesh()
        .x_desc(axes.x_label.as_str())
        .y_desc(axes.y_label.as_str())
        .y_label_formatter(&|y| scale.label(*y))
        .draw()
        .map_err(render_err)?;

    for line in &chart.lines {
        let color = line.style.color;
        let points = xs.iter()
            .zip(&line.values)
            .filter(|&(_, v)| v.is_finite())
            .map(|(&x, &y)| (x, scale.apply(y)))
            .collect::<Vec<_>>();
        ctx.draw_series(LineSeries::new(points.clone(), color.stroke_width(3)))
            .map_err(render_err)?
            .label(line.style.label.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
            });
        draw_markers(&mut ctx, &points, &line.style)?;
    }

    if axes.legend {
        ctx.configure_series_labels()
            .background_style(WHITE.mix(0.8).filled())
            .border_style(BLACK.stroke_width(1))
            .draw()
            .map_err(render_err)?;
    }
    Ok(())
}

fn draw_markers<DB: DrawingBackend>(
    ctx: &mut ChartContext<DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    points: &[(f64, f64)],
    style: &Style,
) -> Result<()> {
    // sizes follow the study's point sizes, scaled down to pixel radii
    let r = style.marker_size / 3;
    if r == 0 {
        return Ok(());
    }
    let c = style.color;
    match style.marker {
        Marker::None => {}
        Marker::Dot => {
            ctx.draw_series(points.iter().map(|&p| Circle::new(p, r, c.filled())))
                .map_err(render_err)?;
        }
        Marker::Cross => {
            ctx.draw_series(points.iter().map(|&p| Cross::new(p, r, c.stroke_width(2))))
                .map_err(render_err)?;
        }
        Marker::Star => {
            ctx.draw_series(points.iter().map(|&p| TriangleMarker::new(p, r, c.filled())))
                .map_err(render_err)?;
        }
        Marker::Pentagon => {
            ctx.draw_series(points.iter().map(|&p| Circle::new(p, r, c.stroke_width(2))))
                .map_err(render_err)?;
        }
        Marker::Diamond => {
            let h = r as i32;
            ctx.draw_series(points.iter().map(|&p| {
                EmptyElement::at(p) + Rectangle::new([(-h, -h), (h, h)], c.filled())
            })).map_err(render_err)?;
        }
    }
    Ok(())
}

/// Draws the overplotted effectiveness bars of `chart` onto `root`.
pub fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &BarChart,
    axes: &Axes,
) -> Result<()> {
    let scale = axes.y_scale;
    root.fill(&WHITE).map_err(render_err)?;

    let n = chart.categories.len() as u32;
    let (y_lo, y_hi) = bar_y_range(chart, scale);

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60);
    if let Some(text) = caption(axes, &chart.dataset) {
        builder.caption(text, ("sans-serif", 14));
    }
    let mut ctx = builder
        .build_cartesian_2d((0u32..n).into_segmented(), y_lo..y_hi)
        .map_err(render_err)?;

    let categories = &chart.categories;
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_desc(axes.x_label.as_str())
        .y_desc(axes.y_label.as_str())
        .x_label_formatter(&|v| match *v {
            SegmentValue::CenterOf(i) => categories.get(i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .y_label_formatter(&|y| scale.label(*y))
        .draw()
        .map_err(render_err)?;

    // bars cover 80% of their slot
    let slot = axes.size.0.saturating_sub(90) / (n + 1);
    let margin = slot / 10;
    for bars in &chart.bars {
        let color = bars.color;
        ctx.draw_series(bars.values.iter().enumerate().map(|(i, &v)| {
            let i = i as u32;
            let mut rect = Rectangle::new(
                [
                    (SegmentValue::Exact(i), y_lo),
                    (SegmentValue::Exact(i + 1), scale.apply(v).max(y_lo)),
                ],
                color.filled(),
            );
            rect.set_margin(0, 0, margin, margin);
            rect
        })).map_err(render_err)?
            .label(bars.label.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if axes.legend {
        ctx.configure_series_labels()
            .background_style(WHITE.mix(0.8).filled())
            .border_style(BLACK.stroke_width(1))
            .draw()
            .map_err(render_err)?;
    }
    Ok(())
}

/// Draws either kind of chart.
pub fn draw<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, chart: &Chart, axes: &Axes) -> Result<()> {
    match *chart {
        Chart::Line(ref c) => draw_lines(root, c, axes),
        Chart::Bar(ref c) => draw_bars(root, c, axes),
    }
}

/// Writes `chart` to an SVG file.
pub fn write_svg(chart: &Chart, path: &str, axes: &Axes) -> Result<()> {
    let root = SVGBackend::new(path, axes.size).into_drawing_area();
    draw(&root, chart, axes)?;
    root.present().map_err(render_err)?;
    Ok(())
}

/// Renders `chart` to an SVG document in memory.
pub fn svg_string(chart: &Chart, axes: &Axes) -> Result<String> {
    let mut out = String::new();
    {
        let root = SVGBackend::with_string(&mut out, axes.size).into_drawing_area();
        draw(&root, chart, axes)?;
        root.present().map_err(render_err)?;
    }
    Ok(out)
}

/// Draws a legend strip: one short line with its marker and label per
/// style, `columns` entries to a row.
pub fn draw_legend<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    entries: &[Style],
    columns: usize,
) -> Result<()> {
    root.fill(&WHITE).map_err(render_err)?;
    let columns = columns.max(1);
    let (width, _) = root.dim_in_pixel();
    let cell = (width as i32) / columns as i32;
    for (i, style) in entries.iter().enumerate() {
        let x = (i % columns) as i32 * cell + 10;
        let y = (i / columns) as i32 * 24 + 14;
        let color = style.color;
        root.draw(&PathElement::new(vec![(x, y), (x + 30, y)], color.stroke_width(3)))
            .map_err(render_err)?;
        let r = style.marker_size.saturating_sub(5) / 3;
        if r > 0 {
            let c = (x + 15, y);
            match style.marker {
                Marker::None => {}
                Marker::Dot => root.draw(&Circle::new(c, r, color.filled())).map_err(render_err)?,
                Marker::Cross => root.draw(&Cross::new(c, r, color.stroke_width(2))).map_err(render_err)?,
                Marker::Star => root.draw(&TriangleMarker::new(c, r, color.filled())).map_err(render_err)?,
                Marker::Pentagon => root.draw(&Circle::new(c, r, color.stroke_width(2))).map_err(render_err)?,
                Marker::Diamond => {
                    let h = r as i32;
                    root.draw(&Rectangle::new([(c.0 - h, c.1 - h), (c.0 + h, c.1 + h)], color.filled()))
                        .map_err(render_err)?
                }
            }
        }
        root.draw(&Text::new(
            style.label.clone(),
            (x + 36, y - 6),
            ("sans-serif", 12).into_font(),
        )).map_err(render_err)?;
    }
    Ok(())
}

/// Size of a legend strip for `entries` styles laid out in `columns`.
pub fn legend_size(entries: usize, columns: usize) -> (u32, u32) {
    let columns = columns.max(1);
    let rows = (entries + columns - 1) / columns;
    (1070, (rows.max(1) * 24 + 8) as u32)
}

/// Writes a legend strip to an SVG file.
pub fn write_legend(path: &str, entries: &[Style], columns: usize) -> Result<()> {
    let root = SVGBackend::new(path, legend_size(entries.len(), columns)).into_drawing_area();
    draw_legend(&root, entries, columns)?;
    root.present().map_err(render_err)?;
    Ok(())
}
