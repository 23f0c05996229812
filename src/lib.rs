//! # ThermoVis-RS: Rolling Temperature Visualizer
//!
//! A small desktop widget that synthesizes a rolling series of temperature
//! samples, classifies each reading against ordered thresholds, and paints
//! a smoothed line chart with grid, axes, legend, and a current-value
//! callout.
//!
//! ## Architecture
//!
//! - **Series core**: [`series::SeriesStore`] owns the fixed-capacity ring
//!   buffer and the regime-biased next-value generator
//! - **Classifier**: [`classify::Thresholds`] maps temperatures to the
//!   color class, status label, legend ranges, and indicator tag
//! - **Renderer**: [`chart::ChartRenderer`] is a stateless pure function of
//!   `(snapshot, current value, surface rect)` painting onto an
//!   [`egui::Painter`]
//! - **Scheduler**: [`scheduler::Ticker`] drives periodic advances from the
//!   cooperative egui frame loop; each tick is one synchronous
//!   advance-render-display unit
//! - **Export**: [`export`] formats the sample window as CSV or JSON
//!   (one-way, no parsing counterpart)
//!
//! ## Example
//!
//! ```
//! use thermovis_rs::classify::Thresholds;
//! use thermovis_rs::config::SeriesConfig;
//! use thermovis_rs::series::SeriesStore;
//!
//! let mut store = SeriesStore::new(SeriesConfig::default(), Thresholds::default());
//! assert_eq!(store.len(), store.capacity());
//!
//! let t = store.advance(chrono::Local::now());
//! assert_eq!(t, store.current_temperature());
//! ```

pub mod chart;
pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod frontend;
pub mod scheduler;
pub mod series;

// Re-export commonly used types
pub use chart::ChartRenderer;
pub use classify::{TempClass, TempStatus, Thresholds};
pub use config::{ChartStyle, SeriesConfig};
pub use error::{Result, ThermoVisError};
pub use export::ExportFormat;
pub use frontend::ThermoVisApp;
pub use scheduler::Ticker;
pub use series::{NoiseSource, Sample, ScriptedNoise, SeriesStore};
