//! Configuration for the series generator and the chart renderer
//!
//! All configuration is initialization-time: there is no runtime config file
//! or protocol. The structs are serde-derived so the app can persist the
//! user's last settings through eframe storage.
//!
//! # Main Types
//!
//! - [`SeriesConfig`] - Clamp bounds, capacity, perturbation magnitude, tick period
//! - [`ChartStyle`] - Padding insets, grid density, stroke widths
//!
//! Classification thresholds live in [`crate::classify`].
//!
//! # Variation semantics
//!
//! `variation` is the full peak-to-peak perturbation magnitude. Initial
//! seeding and normal-regime steps draw from `[-variation/2, +variation/2]`;
//! the elevated regime cools by `[0, variation/2]` or jitters by
//! `[-variation/4, +variation/4]`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of samples kept in the rolling window
pub const DATA_POINTS: usize = 50;

/// Default period between advance ticks in milliseconds
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 2000;

/// Default full peak-to-peak perturbation magnitude in degrees C
pub const DEFAULT_VARIATION: f64 = 20.0;

/// Default clamp bounds for generated temperatures
pub const DEFAULT_MIN_TEMP: f64 = 0.0;
pub const DEFAULT_MAX_TEMP: f64 = 50.0;

/// Safe sub-range the randomized base temperature is drawn from on reset
pub const SAFE_BASE_RANGE: (f64, f64) = (20.0, 30.0);

/// Probability of a cooling step while in the elevated regime
pub const DEFAULT_COOLING_BIAS: f64 = 0.7;

/// Configuration for the rolling temperature series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Lower clamp bound for generated temperatures
    pub min_temp: f64,
    /// Upper clamp bound for generated temperatures
    pub max_temp: f64,
    /// Visible window size (ring buffer capacity)
    pub capacity: usize,
    /// Full peak-to-peak magnitude of the per-tick perturbation
    pub variation: f64,
    /// Scheduling period for the external ticker in milliseconds
    pub update_interval_ms: u64,
    /// Probability of a cooling step once the danger threshold is crossed
    pub cooling_bias: f64,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            min_temp: DEFAULT_MIN_TEMP,
            max_temp: DEFAULT_MAX_TEMP,
            capacity: DATA_POINTS,
            variation: DEFAULT_VARIATION,
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            cooling_bias: DEFAULT_COOLING_BIAS,
        }
    }
}

impl SeriesConfig {
    /// The tick period as a [`Duration`]
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    /// Clamp a raw temperature into the configured bounds
    #[inline]
    pub fn clamp(&self, t: f64) -> f64 {
        t.clamp(self.min_temp, self.max_temp)
    }

    /// Validate the configuration, returning a descriptive error for
    /// unusable combinations
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(self.min_temp < self.max_temp) {
            return Err(crate::error::ThermoVisError::Config(format!(
                "min_temp ({}) must be below max_temp ({})",
                self.min_temp, self.max_temp
            )));
        }
        if self.capacity < 2 {
            return Err(crate::error::ThermoVisError::Config(format!(
                "capacity ({}) must be at least 2",
                self.capacity
            )));
        }
        if !(0.0..=1.0).contains(&self.cooling_bias) {
            return Err(crate::error::ThermoVisError::Config(format!(
                "cooling_bias ({}) must be within [0, 1]",
                self.cooling_bias
            )));
        }
        Ok(())
    }
}

/// Padding insets around the plot rectangle, in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Insets {
    fn default() -> Self {
        // Right inset leaves room for the current-value callout
        Self {
            top: 24.0,
            right: 72.0,
            bottom: 44.0,
            left: 56.0,
        }
    }
}

/// Visual style for the chart renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    /// Padding between the surface edge and the plot rectangle
    pub padding: Insets,
    /// Number of horizontal grid lines
    pub h_grid_lines: usize,
    /// Number of vertical grid lines
    pub v_grid_lines: usize,
    /// Stroke width of the temperature curve
    pub line_width: f32,
    /// Radius of the per-point markers
    pub marker_radius: f32,
    /// Whether per-point markers are drawn
    pub show_markers: bool,
    /// Whether the legend box is drawn
    pub show_legend: bool,
    /// Maximum number of time-of-day labels along the x axis
    pub max_time_labels: usize,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            padding: Insets::default(),
            h_grid_lines: 5,
            v_grid_lines: 10,
            line_width: 2.0,
            marker_radius: 2.5,
            show_markers: true,
            show_legend: true,
            max_time_labels: 5,
        }
    }
}
