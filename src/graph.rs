// Preview render surface: rasterizes chart options to PNG with plotters

use crate::color::{parse_color, Rgba, FALLBACK_PALETTE};
use crate::data::cell_as_f64;
use crate::guides::{HoverPoint, LegendPosition};
use crate::ir::{AxisSpec, ChartOptions, PointSpec};
use crate::lifecycle::{ChartContext, Container, EventHandler, RenderSurface, SizeHints};
use crate::RenderOptions;
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::prelude::*;
use serde_json::Value;
use std::ops::Range;

/// Container creating [`PngSurface`]s of a fixed initial size
#[derive(Debug, Clone, Default)]
pub struct PngTarget {
    pub options: RenderOptions,
}

impl PngTarget {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl Container for PngTarget {
    type Surface = PngSurface;

    fn init_surface(&mut self, _context: &ChartContext) -> Result<PngSurface> {
        if self.options.width == 0 || self.options.height == 0 {
            anyhow::bail!(
                "Cannot create a {}x{} surface",
                self.options.width,
                self.options.height
            );
        }
        Ok(PngSurface::new(self.options.clone()))
    }
}

/// Bitmap surface. Every `set_option` re-renders the whole image.
pub struct PngSurface {
    options: RenderOptions,
    chart: Option<ChartOptions>,
    png: Option<Vec<u8>>,
    handlers: Vec<(String, EventHandler)>,
}

impl PngSurface {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            chart: None,
            png: None,
            handlers: Vec::new(),
        }
    }

    /// Encoded image of the current options, if any
    pub fn png(&self) -> Option<&[u8]> {
        self.png.as_deref()
    }

    pub fn chart(&self) -> Option<&ChartOptions> {
        self.chart.as_ref()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.options.width, self.options.height)
    }

    /// Invoke every handler registered for `event`; returns how many ran
    pub fn dispatch(&self, event: &str, payload: &Value) -> usize {
        let mut count = 0;
        for (_, handler) in self.handlers.iter().filter(|(name, _)| name == event) {
            handler(payload);
            count += 1;
        }
        count
    }

    /// Tooltip text for a point of the rendered options
    pub fn hover(&self, series: usize, point: usize) -> Option<String> {
        let chart = self.chart.as_ref()?;
        let spec = chart.series.get(series)?.data.get(point)?;
        Some(chart.tooltip.formatter.format(&[HoverPoint {
            name: spec.name.clone(),
            value: spec.value.clone(),
        }]))
    }

    fn redraw(&mut self) -> Result<()> {
        self.png = match &self.chart {
            Some(chart) => Some(render_png(chart, self.options.width, self.options.height)?),
            None => None,
        };
        Ok(())
    }
}

impl RenderSurface for PngSurface {
    fn set_option(&mut self, options: &ChartOptions) -> Result<()> {
        self.chart = Some(options.clone());
        self.redraw()
    }

    fn clear(&mut self) {
        self.chart = None;
        self.png = None;
    }

    fn resize(&mut self, hints: &SizeHints) -> Result<()> {
        if let Some(width) = hints.width.filter(|w| *w > 0) {
            self.options.width = width;
        }
        if let Some(height) = hints.height.filter(|h| *h > 0) {
            self.options.height = height;
        }
        self.redraw()
    }

    fn on(&mut self, event: &str, handler: EventHandler) {
        self.handlers.push((event.to_string(), handler));
    }

    fn dispose(&mut self) {
        self.clear();
        self.handlers.clear();
    }
}

/// Dimensions 0 and 1 of the value record; `None` when not plottable
fn point_coords(point: &PointSpec) -> Option<(f64, f64)> {
    let x = point.value.first().and_then(cell_as_f64)?;
    let y = point.value.get(1).and_then(cell_as_f64)?;
    Some((x, y))
}

/// Byte length of an RGB buffer, or an error when it does not fit in memory
fn rgb_buffer_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .with_context(|| format!("Image of {}x{} is too large", width, height))
}

/// Padded data range, overridden by explicit axis bounds
fn axis_range(values: impl Iterator<Item = f64>, axis: &AxisSpec) -> Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let (lo, hi) = if lo.is_finite() && hi.is_finite() { (lo, hi) } else { (0.0, 1.0) };

    let padded = if lo == hi {
        (lo - 1.0)..(hi + 1.0)
    } else {
        let padding = (hi - lo) * 0.05;
        (lo - padding)..(hi + padding)
    };

    let start = axis.min.unwrap_or(padded.start);
    let end = axis.max.unwrap_or(padded.end);
    if start < end {
        start..end
    } else {
        padded
    }
}

fn series_color(color: Option<&str>, index: usize) -> Rgba {
    color
        .and_then(parse_color)
        .unwrap_or(FALLBACK_PALETTE[index % FALLBACK_PALETTE.len()])
}

fn legend_anchor(position: LegendPosition) -> SeriesLabelPosition {
    match position {
        LegendPosition::Top => SeriesLabelPosition::UpperMiddle,
        LegendPosition::Bottom => SeriesLabelPosition::LowerMiddle,
        LegendPosition::Left => SeriesLabelPosition::UpperLeft,
        LegendPosition::Right => SeriesLabelPosition::UpperRight,
    }
}

/// Rasterize options into an encoded PNG
pub fn render_png(chart: &ChartOptions, width: u32, height: u32) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        anyhow::bail!("Cannot render a {}x{} image", width, height);
    }
    let mut buffer = vec![0u8; rgb_buffer_len(width, height)?];

    let placed: Vec<Vec<((f64, f64), &PointSpec)>> = chart
        .series
        .iter()
        .map(|s| {
            s.data
                .iter()
                .filter_map(|p| point_coords(p).map(|xy| (xy, p)))
                .collect()
        })
        .collect();

    let x_range = axis_range(placed.iter().flatten().map(|((x, _), _)| *x), &chart.x_axis);
    let y_range = axis_range(placed.iter().flatten().map(|((_, y), _)| *y), &chart.y_axis);

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(10);
        if chart.x_axis.axis_label.show {
            builder.x_label_area_size(40);
        }
        if chart.y_axis.axis_label.show {
            builder.y_label_area_size(60);
        }
        let mut plot = builder
            .build_cartesian_2d(x_range, y_range)
            .context("Failed to build chart")?;

        let mut mesh = plot.configure_mesh();
        if let Some(name) = &chart.x_axis.name {
            mesh.x_desc(name.as_str());
        }
        if let Some(name) = &chart.y_axis.name {
            mesh.y_desc(name.as_str());
        }
        if !chart.x_axis.split_line.show {
            mesh.disable_x_mesh();
        }
        if !chart.y_axis.split_line.show {
            mesh.disable_y_mesh();
        }
        mesh.draw().context("Failed to draw mesh")?;

        for (idx, (series, points)) in chart.series.iter().zip(&placed).enumerate() {
            let color = series_color(series.item_style.color.as_deref(), idx).to_rgba();
            let drawn = plot
                .draw_series(points.iter().map(|((x, y), p)| {
                    let radius = (p.symbol_size / 2.0).round().max(1.0) as i32;
                    Circle::new((*x, *y), radius, color.filled())
                }))
                .context("Failed to draw point series")?;
            if chart.legend.show {
                drawn
                    .label(series.name.as_str())
                    .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
            }
        }

        if chart.legend.show && !chart.series.is_empty() {
            plot.configure_series_labels()
                .position(legend_anchor(chart.legend.position))
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .context("Failed to draw legend")?;
        }

        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png_bytes)
        .write_image(&buffer, width, height, image::ColorType::Rgb8)
        .context("Failed to encode PNG")?;
    Ok(png_bytes)
}
