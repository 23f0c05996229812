//! Custom widgets for the ThermoVis-RS UI
//!
//! # Widgets
//!
//! - [`StatusIndicator`] - Colored status dot with a discrete state tag
//! - [`ValueDisplay`] - Formatted value with label and optional unit
//! - [`TransientNotice`] - Auto-dismissing (3 s) overlay notice for failures

use crate::classify::{TempClass, TempStatus};
use egui::{Align2, Color32, Response, Ui, Widget};
use std::time::{Duration, Instant};

/// How long a transient notice stays on screen
const NOTICE_DURATION: Duration = Duration::from_secs(3);

/// A widget that displays a colored status dot with its state tag
pub struct StatusIndicator {
    color: Color32,
    label: String,
    tooltip: Option<String>,
}

impl StatusIndicator {
    /// Create a new status indicator with the given color and label
    pub fn new(color: Color32, label: impl Into<String>) -> Self {
        Self {
            color,
            label: label.into(),
            tooltip: None,
        }
    }

    /// Indicator for a temperature classification
    pub fn from_class(class: TempClass, status: TempStatus) -> Self {
        Self::new(class.color(), status.display_text()).with_tooltip(class.tag())
    }

    /// Add a tooltip to the indicator
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}

impl Widget for StatusIndicator {
    fn ui(self, ui: &mut Ui) -> Response {
        let response = ui.horizontal(|ui| {
            ui.colored_label(self.color, "\u{25cf}");
            ui.colored_label(self.color, &self.label);
        });

        let response = response.response;

        if let Some(tooltip) = self.tooltip {
            response.on_hover_text(tooltip)
        } else {
            response
        }
    }
}

/// A widget for displaying a value with a label and optional unit
pub struct ValueDisplay {
    label: String,
    value: String,
    unit: Option<String>,
    color: Option<Color32>,
}

impl ValueDisplay {
    /// Create a new value display
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            unit: None,
            color: None,
        }
    }

    /// Create a new value display from a numeric value
    pub fn from_f64(label: impl Into<String>, value: f64, precision: usize) -> Self {
        Self::new(
            label,
            format!("{:.precision$}", value, precision = precision),
        )
    }

    /// Add a unit to the display
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Set the color of the value
    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = Some(color);
        self
    }
}

impl Widget for ValueDisplay {
    fn ui(self, ui: &mut Ui) -> Response {
        ui.horizontal(|ui| {
            ui.label(format!("{}:", self.label));
            let text = match &self.unit {
                Some(unit) => format!("{} {}", self.value, unit),
                None => self.value.clone(),
            };
            match self.color {
                Some(color) => ui.colored_label(color, egui::RichText::new(text).strong()),
                None => ui.label(egui::RichText::new(text).strong()),
            }
        })
        .response
    }
}

/// A transient, auto-dismissing notice shown over the chart
///
/// Used to report environmental failures (export errors, unusable
/// persisted configuration) once, without blocking or retrying.
pub struct TransientNotice {
    message: String,
    shown_at: Instant,
}

impl TransientNotice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    /// Whether the notice has outlived its display window
    pub fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= NOTICE_DURATION
    }

    /// Draw the notice as a floating overlay near the top of the viewport
    pub fn show(&self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("transient_notice"))
            .anchor(Align2::CENTER_TOP, egui::Vec2::new(0.0, 24.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(Color32::from_rgb(50, 40, 20))
                    .show(ui, |ui| {
                        ui.colored_label(Color32::from_rgb(255, 200, 120), &self.message);
                    });
            });
        // Keep repainting so the notice disappears without user input
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}
