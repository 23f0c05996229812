//! Chart rendering onto an egui painter
//!
//! The renderer is stateless: given a snapshot of the sample series, the
//! current temperature, and a drawing rect, it paints the full chart in
//! fixed layer order. Rendering the same snapshot twice produces the same
//! shapes, since nothing here persists between calls.
//!
//! # Layer order (later layers draw over earlier ones)
//!
//! background fill -> grid lines -> axes with tick labels -> axis titles ->
//! temperature curve -> per-point markers -> legend box -> current-value
//! callout
//!
//! # Coordinate mapping
//!
//! Both mappings are affine and monotone. `temp_to_y` inverts the y axis so
//! higher temperatures sit higher on the surface; out-of-range values
//! extrapolate linearly instead of panicking (the store clamps first, so
//! they are not expected). `index_to_x` spans the indices currently in the
//! buffer, with `capacity - 1` as the minimum denominator so the scale
//! stays stable while the buffer is still filling.

use crate::classify::Thresholds;
use crate::config::{ChartStyle, Insets, SeriesConfig};
use crate::error::{Result, ThermoVisError};
use crate::series::Sample;
use egui::epaint::TextShape;
use egui::{Align2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, Shape, Stroke, StrokeKind};

/// Background fill of the whole surface
const SURFACE_FILL: Color32 = Color32::from_rgb(24, 26, 30);
/// Fill of the plot rectangle
const PLOT_FILL: Color32 = Color32::from_rgb(30, 33, 38);
/// Grid line color
const GRID_COLOR: Color32 = Color32::from_gray(48);
/// Axis line color
const AXIS_COLOR: Color32 = Color32::from_gray(120);
/// Tick and title text color
const TEXT_COLOR: Color32 = Color32::from_gray(180);

/// Flattening resolution of the smoothed curve
const CURVE_SEGMENT_STEPS: usize = 8;

/// The inset drawing region within the surface after padding is subtracted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PlotRect {
    /// Compute the plot rectangle from a surface rect and padding insets
    ///
    /// Fails when the surface is degenerate (non-finite or too small to
    /// hold the insets), which is the renderer's only error condition; the
    /// caller logs it and keeps whatever was previously painted.
    pub fn from_surface(surface: Rect, padding: &Insets) -> Result<Self> {
        if !surface.is_finite() {
            return Err(ThermoVisError::Render(
                "drawing surface has non-finite bounds".to_string(),
            ));
        }
        let width = surface.width() - padding.left - padding.right;
        let height = surface.height() - padding.top - padding.bottom;
        if width < 1.0 || height < 1.0 {
            return Err(ThermoVisError::Render(format!(
                "drawing surface {}x{} too small for padding insets",
                surface.width(),
                surface.height()
            )));
        }
        Ok(Self {
            x: surface.left() + padding.left,
            y: surface.top() + padding.top,
            width,
            height,
        })
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// As an egui rect
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(
            Pos2::new(self.x, self.y),
            egui::Vec2::new(self.width, self.height),
        )
    }
}

/// Map a temperature to a surface y coordinate (inverted axis)
pub fn temp_to_y(plot: &PlotRect, min: f64, max: f64, t: f64) -> f32 {
    let frac = (t - min) / (max - min);
    plot.bottom() - (frac * plot.height as f64) as f32
}

/// Map a sample index to a surface x coordinate
///
/// `first` and `last` are the smallest and largest indices currently
/// buffered; the denominator never drops below `capacity - 1`.
pub fn index_to_x(plot: &PlotRect, first: u64, last: u64, capacity: usize, index: u64) -> f32 {
    let span = (last.saturating_sub(first)).max(capacity.saturating_sub(1) as u64) as f64;
    let frac = (index.saturating_sub(first)) as f64 / span;
    plot.x + (frac * plot.width as f64) as f32
}

/// Evenly spaced round tick values spanning `[min, max]`
///
/// Step selection follows the usual 1/2/5 ladder so ticks land on round
/// temperatures.
pub fn temperature_ticks(min: f64, max: f64) -> Vec<f64> {
    let range = max - min;
    let raw_step = range / 5.0;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw_step)
        .unwrap_or(10.0 * magnitude);

    let mut ticks = Vec::new();
    let mut t = (min / step).ceil() * step;
    while t <= max + step * 1e-9 {
        ticks.push(t);
        t += step;
    }
    ticks
}

/// Flatten the series of screen points into a quadratically smoothed path
///
/// Uses the midpoint technique: each interior point becomes the control of
/// a quadratic segment ending at the midpoint to its successor, with the
/// final segment landing exactly on the last point. Fewer than three points
/// degrade to a straight polyline.
pub fn smooth_path(points: &[Pos2]) -> Vec<Pos2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity((points.len() - 1) * CURVE_SEGMENT_STEPS + 1);
    out.push(points[0]);
    let mut start = points[0];
    for i in 1..points.len() - 1 {
        let control = points[i];
        let end = if i < points.len() - 2 {
            midpoint(points[i], points[i + 1])
        } else {
            points[i + 1]
        };
        for step in 1..=CURVE_SEGMENT_STEPS {
            let t = step as f32 / CURVE_SEGMENT_STEPS as f32;
            out.push(quadratic_point(start, control, end, t));
        }
        start = end;
    }
    out
}

fn midpoint(a: Pos2, b: Pos2) -> Pos2 {
    Pos2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

fn quadratic_point(a: Pos2, c: Pos2, b: Pos2, t: f32) -> Pos2 {
    let u = 1.0 - t;
    Pos2::new(
        u * u * a.x + 2.0 * u * t * c.x + t * t * b.x,
        u * u * a.y + 2.0 * u * t * c.y + t * t * b.y,
    )
}

/// Stateless chart renderer
///
/// Borrows the active configuration for the duration of one render call; a
/// pure function of `(snapshot, current value, surface rect)`.
pub struct ChartRenderer<'a> {
    pub config: &'a SeriesConfig,
    pub thresholds: &'a Thresholds,
    pub style: &'a ChartStyle,
}

impl<'a> ChartRenderer<'a> {
    pub fn new(config: &'a SeriesConfig, thresholds: &'a Thresholds, style: &'a ChartStyle) -> Self {
        Self {
            config,
            thresholds,
            style,
        }
    }

    /// Paint the full chart for one snapshot
    ///
    /// Aborts without painting anything when the surface is degenerate;
    /// otherwise paints every layer in order.
    pub fn render(
        &self,
        painter: &Painter,
        surface: Rect,
        samples: &[Sample],
        current: f64,
    ) -> Result<()> {
        let plot = PlotRect::from_surface(surface, &self.style.padding)?;

        painter.rect_filled(surface, CornerRadius::ZERO, SURFACE_FILL);
        painter.rect_filled(plot.rect(), CornerRadius::ZERO, PLOT_FILL);
        self.draw_grid(painter, &plot);
        self.draw_axes(painter, &plot, samples);
        self.draw_axis_titles(painter, surface, &plot);

        if !samples.is_empty() {
            let points = self.screen_points(&plot, samples);
            let class_color = self.thresholds.class(current).color();
            self.draw_curve(painter, &points, class_color);
            if self.style.show_markers {
                self.draw_markers(painter, &points, class_color);
            }
            self.draw_callout(painter, &plot, &points, current, class_color);
        }
        if self.style.show_legend {
            self.draw_legend(painter, &plot);
        }

        Ok(())
    }

    /// Project the snapshot into surface coordinates
    fn screen_points(&self, plot: &PlotRect, samples: &[Sample]) -> Vec<Pos2> {
        let first = samples[0].index;
        let last = samples[samples.len() - 1].index;
        samples
            .iter()
            .map(|s| {
                Pos2::new(
                    index_to_x(plot, first, last, self.config.capacity, s.index),
                    temp_to_y(plot, self.config.min_temp, self.config.max_temp, s.temperature),
                )
            })
            .collect()
    }

    fn draw_grid(&self, painter: &Painter, plot: &PlotRect) {
        let stroke = Stroke::new(1.0, GRID_COLOR);
        for i in 1..=self.style.h_grid_lines {
            let frac = i as f32 / (self.style.h_grid_lines + 1) as f32;
            let y = plot.y + frac * plot.height;
            painter.line_segment(
                [Pos2::new(plot.x, y), Pos2::new(plot.right(), y)],
                stroke,
            );
        }
        for i in 1..=self.style.v_grid_lines {
            let frac = i as f32 / (self.style.v_grid_lines + 1) as f32;
            let x = plot.x + frac * plot.width;
            painter.line_segment(
                [Pos2::new(x, plot.y), Pos2::new(x, plot.bottom())],
                stroke,
            );
        }
    }

    fn draw_axes(&self, painter: &Painter, plot: &PlotRect, samples: &[Sample]) {
        let stroke = Stroke::new(1.0, AXIS_COLOR);
        let font = FontId::proportional(11.0);

        // Axis lines: left and bottom edges of the plot rectangle
        painter.line_segment(
            [Pos2::new(plot.x, plot.y), Pos2::new(plot.x, plot.bottom())],
            stroke,
        );
        painter.line_segment(
            [
                Pos2::new(plot.x, plot.bottom()),
                Pos2::new(plot.right(), plot.bottom()),
            ],
            stroke,
        );

        // Temperature ticks at round values
        for tick in temperature_ticks(self.config.min_temp, self.config.max_temp) {
            let y = temp_to_y(plot, self.config.min_temp, self.config.max_temp, tick);
            painter.line_segment(
                [Pos2::new(plot.x - 4.0, y), Pos2::new(plot.x, y)],
                stroke,
            );
            painter.text(
                Pos2::new(plot.x - 7.0, y),
                Align2::RIGHT_CENTER,
                format!("{:.0}", tick),
                font.clone(),
                TEXT_COLOR,
            );
        }

        // Time-of-day labels sampled from the series, thinned
        if samples.is_empty() || self.style.max_time_labels == 0 {
            return;
        }
        let first = samples[0].index;
        let last = samples[samples.len() - 1].index;
        let stride = samples.len().div_ceil(self.style.max_time_labels).max(1);
        for sample in samples.iter().step_by(stride) {
            let x = index_to_x(plot, first, last, self.config.capacity, sample.index);
            painter.line_segment(
                [
                    Pos2::new(x, plot.bottom()),
                    Pos2::new(x, plot.bottom() + 4.0),
                ],
                stroke,
            );
            painter.text(
                Pos2::new(x, plot.bottom() + 7.0),
                Align2::CENTER_TOP,
                sample.timestamp.format("%H:%M:%S").to_string(),
                font.clone(),
                TEXT_COLOR,
            );
        }
    }

    fn draw_axis_titles(&self, painter: &Painter, surface: Rect, plot: &PlotRect) {
        let font = FontId::proportional(12.0);
        painter.text(
            Pos2::new(plot.x + plot.width / 2.0, surface.bottom() - 4.0),
            Align2::CENTER_BOTTOM,
            "Time",
            font.clone(),
            TEXT_COLOR,
        );

        // Vertical y-axis title, rotated a quarter turn counter-clockwise
        let galley = painter.layout_no_wrap("Temperature (\u{b0}C)".to_string(), font, TEXT_COLOR);
        let pos = Pos2::new(
            surface.left() + 4.0,
            plot.y + plot.height / 2.0 + galley.size().x / 2.0,
        );
        painter.add(
            TextShape::new(pos, galley, TEXT_COLOR).with_angle(-std::f32::consts::FRAC_PI_2),
        );
    }

    fn draw_curve(&self, painter: &Painter, points: &[Pos2], color: Color32) {
        if points.len() < 2 {
            return;
        }
        let path = smooth_path(points);
        painter.add(Shape::line(path, Stroke::new(self.style.line_width, color)));
    }

    fn draw_markers(&self, painter: &Painter, points: &[Pos2], color: Color32) {
        for p in points {
            painter.circle_filled(*p, self.style.marker_radius, color);
        }
    }

    /// Highlight the newest sample and label its value beside the plot
    fn draw_callout(
        &self,
        painter: &Painter,
        plot: &PlotRect,
        points: &[Pos2],
        current: f64,
        color: Color32,
    ) {
        let Some(last) = points.last() else {
            return;
        };
        painter.circle_filled(*last, self.style.marker_radius * 2.0, color);
        painter.circle_stroke(*last, self.style.marker_radius * 2.0 + 1.5, Stroke::new(1.0, TEXT_COLOR));
        painter.text(
            Pos2::new(plot.right() + 8.0, last.y),
            Align2::LEFT_CENTER,
            format!("{:.1} \u{b0}C", current),
            FontId::proportional(13.0),
            color,
        );
    }

    fn draw_legend(&self, painter: &Painter, plot: &PlotRect) {
        let font = FontId::proportional(11.0);
        let entries = self.thresholds.legend_entries();
        let galleys: Vec<_> = entries
            .iter()
            .map(|e| {
                painter.layout_no_wrap(
                    format!("{} {}", e.class.display_name(), e.range_text),
                    font.clone(),
                    TEXT_COLOR,
                )
            })
            .collect();

        let swatch = 10.0;
        let pad = 6.0;
        let row_h = 16.0;
        let text_w = galleys
            .iter()
            .map(|g| g.size().x)
            .fold(0.0f32, f32::max);
        let box_rect = Rect::from_min_size(
            Pos2::new(plot.x + 8.0, plot.y + 8.0),
            egui::Vec2::new(pad * 3.0 + swatch + text_w, pad * 2.0 + row_h * entries.len() as f32),
        );

        painter.rect_filled(box_rect, CornerRadius::same(3), Color32::from_black_alpha(160));
        painter.rect_stroke(
            box_rect,
            CornerRadius::same(3),
            Stroke::new(1.0, GRID_COLOR),
            StrokeKind::Inside,
        );

        for (i, (entry, galley)) in entries.iter().zip(galleys).enumerate() {
            let y = box_rect.top() + pad + i as f32 * row_h;
            let swatch_rect = Rect::from_min_size(
                Pos2::new(box_rect.left() + pad, y + (row_h - swatch) / 2.0),
                egui::Vec2::splat(swatch),
            );
            painter.rect_filled(swatch_rect, CornerRadius::same(2), entry.class.color());
            painter.add(TextShape::new(
                Pos2::new(swatch_rect.right() + pad, y + (row_h - galley.size().y) / 2.0),
                galley,
                TEXT_COLOR,
            ));
        }
    }
}
