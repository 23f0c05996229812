//! Main application state and frame loop
//!
//! [`ThermoVisApp`] owns the series store, the ticker, and the display
//! configuration. Each frame is one cooperative unit: poll the ticker,
//! advance the series if due, repaint the chart, and refresh the status
//! display. The chart itself is custom-painted; see [`crate::chart`].

use crate::chart::ChartRenderer;
use crate::classify::Thresholds;
use crate::config::{ChartStyle, SeriesConfig};
use crate::export::{self, ExportFormat};
use crate::frontend::widgets::{StatusIndicator, TransientNotice, ValueDisplay};
use crate::scheduler::Ticker;
use crate::series::SeriesStore;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Settings persisted across sessions through eframe storage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedSettings {
    config: SeriesConfig,
    thresholds: Thresholds,
    style: ChartStyle,
}

/// Main application state implementing [`eframe::App`]
pub struct ThermoVisApp {
    store: SeriesStore,
    ticker: Ticker,
    thresholds: Thresholds,
    style: ChartStyle,
    export_format: ExportFormat,
    notice: Option<TransientNotice>,
}

impl ThermoVisApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut notice = None;
        let persisted: PersistedSettings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        // An unusable persisted configuration is reported once and
        // replaced with defaults; it is not retried.
        let config = match persisted.config.validate() {
            Ok(()) => persisted.config,
            Err(e) => {
                tracing::warn!("Persisted configuration rejected: {e}");
                notice = Some(TransientNotice::new(format!(
                    "Stored settings were invalid and have been reset: {e}"
                )));
                SeriesConfig::default()
            }
        };

        let thresholds = persisted.thresholds;
        let store = SeriesStore::new(config, thresholds);
        let mut ticker = Ticker::new(config.update_interval());
        ticker.start(Instant::now());
        tracing::info!(
            capacity = config.capacity,
            interval_ms = config.update_interval_ms,
            "Series initialized"
        );

        Self {
            store,
            ticker,
            thresholds,
            style: persisted.style,
            export_format: ExportFormat::Csv,
            notice,
        }
    }

    /// Stop, regenerate, and restart; cannot leave two schedules active
    fn reset(&mut self) {
        self.ticker.stop();
        self.store.reset(Local::now());
        self.ticker.start(Instant::now());
        tracing::info!("Series reset");
    }

    fn toggle_running(&mut self) {
        if self.ticker.is_running() {
            self.ticker.stop();
            tracing::debug!("Ticker stopped");
        } else {
            self.ticker.start(Instant::now());
            tracing::debug!("Ticker started");
        }
    }

    fn export_series(&mut self) {
        let format = self.export_format;
        let Some(path) = rfd::FileDialog::new()
            .add_filter(format.display_name(), &[format.extension()])
            .set_file_name(format!("temperature_log.{}", format.extension()))
            .save_file()
        else {
            return;
        };

        let samples = self.store.snapshot();
        match export::write_series(&path, format, &samples, &self.thresholds) {
            Ok(()) => {
                tracing::info!(?path, count = samples.len(), "Series exported");
                self.notice = Some(TransientNotice::new(format!(
                    "Exported {} samples to {}",
                    samples.len(),
                    path.display()
                )));
            }
            Err(e) => {
                tracing::error!("Export failed: {e}");
                self.notice = Some(TransientNotice::new(format!("Export failed: {e}")));
            }
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let run_label = if self.ticker.is_running() {
                "\u{23f8} Stop"
            } else {
                "\u{25b6} Start"
            };
            if ui.button(run_label).clicked() {
                self.toggle_running();
            }
            if ui.button("\u{21bb} Reset").clicked() {
                self.reset();
            }

            ui.separator();

            egui::ComboBox::from_id_salt("export_format")
                .selected_text(self.export_format.display_name())
                .show_ui(ui, |ui| {
                    for format in ExportFormat::all() {
                        ui.selectable_value(
                            &mut self.export_format,
                            *format,
                            format.display_name(),
                        );
                    }
                });
            if ui.button("Export\u{2026}").clicked() {
                self.export_series();
            }

            ui.separator();

            ui.checkbox(&mut self.style.show_markers, "Markers");
            ui.checkbox(&mut self.style.show_legend, "Legend");
        });
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        let current = self.store.current_temperature();
        let class = self.thresholds.class(current);
        let status = self.thresholds.status(current);

        ui.horizontal(|ui| {
            ui.add(
                ValueDisplay::from_f64("Current", current, 1)
                    .with_unit("\u{b0}C")
                    .with_color(class.color()),
            );
            ui.separator();
            ui.add(StatusIndicator::from_class(class, status));
            ui.separator();
            ui.label(format!(
                "{} / {} samples",
                self.store.len(),
                self.store.capacity()
            ));
            if !self.ticker.is_running() {
                ui.separator();
                ui.colored_label(egui::Color32::GRAY, "Paused");
            }
        });
    }

    fn chart_panel(&self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::hover());
        let renderer = ChartRenderer::new(self.store.config(), &self.thresholds, &self.style);
        let samples = self.store.snapshot();
        if let Err(e) = renderer.render(
            &painter,
            response.rect,
            &samples,
            self.store.current_temperature(),
        ) {
            // Abort this render only; whatever was painted before stays
            tracing::warn!("Chart render skipped: {e}");
        }
    }
}

impl eframe::App for ThermoVisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        if self.ticker.poll(now) {
            let t = self.store.advance(Local::now());
            tracing::trace!(temperature = t, "Series advanced");
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.toolbar(ui);
        });
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_bar(ui);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_panel(ui);
        });

        if let Some(notice) = &self.notice {
            if notice.expired(now) {
                self.notice = None;
            } else {
                notice.show(ctx);
            }
        }

        // Wake up exactly when the next tick is due
        if let Some(remaining) = self.ticker.time_until_due(Instant::now()) {
            ctx.request_repaint_after(remaining);
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(
            storage,
            eframe::APP_KEY,
            &PersistedSettings {
                config: *self.store.config(),
                thresholds: self.thresholds,
                style: self.style.clone(),
            },
        );
    }
}
