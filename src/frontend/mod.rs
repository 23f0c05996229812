//! Frontend module for the egui UI
//!
//! The UI is thin glue around the core: a toolbar (start/stop, reset,
//! export), the custom-painted chart in the central panel, and a status bar
//! carrying the current reading and its classification.
//!
//! # Main Types
//!
//! - [`ThermoVisApp`] - Application state implementing [`eframe::App`]
//!
//! # Submodules
//!
//! - `app` - Frame loop, panels, and control wiring
//! - `widgets` - Status indicator, value display, transient notices

pub mod app;
pub mod widgets;

pub use app::ThermoVisApp;
pub use widgets::{StatusIndicator, TransientNotice, ValueDisplay};
