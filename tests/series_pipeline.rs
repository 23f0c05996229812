//! Integration tests for the series pipeline
//!
//! These tests validate the complete core workflow:
//! - Deterministic advance/eviction with a scripted noise source
//! - Classifier agreement across status, color class, and legend
//! - Export output for a known buffer

use chrono::{Local, TimeZone};
use proptest::prelude::*;
use thermovis_rs::classify::{TempClass, Thresholds};
use thermovis_rs::config::SeriesConfig;
use thermovis_rs::export::{self, ExportFormat};
use thermovis_rs::series::{ScriptedNoise, SeriesStore};

fn test_config() -> SeriesConfig {
    SeriesConfig {
        min_temp: 10.0,
        max_temp: 50.0,
        capacity: 5,
        ..Default::default()
    }
}

#[test]
fn test_seeded_advance_evicts_oldest_exactly() {
    let now = Local.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).single().unwrap();
    let mut store = SeriesStore::seeded(
        test_config(),
        Thresholds::default(),
        &[20.0, 21.0, 22.0, 23.0, 24.0],
        // Normal regime: one draw of 0.75 -> step (0.75 - 0.5) * 20 = +5
        Box::new(ScriptedNoise::new(&[0.75])),
        now,
    );
    assert_eq!(store.len(), 5);
    assert_eq!(store.oldest().map(|s| (s.index, s.temperature)), Some((0, 20.0)));

    let next = store.advance(now + chrono::Duration::seconds(1));

    assert!((next - 29.0).abs() < 1e-9);
    assert_eq!(store.len(), 5, "advance at capacity must not grow the buffer");
    let contents: Vec<(u64, f64)> = store.iter().map(|s| (s.index, s.temperature)).collect();
    assert_eq!(
        contents,
        vec![(1, 21.0), (2, 22.0), (3, 23.0), (4, 24.0), (5, 29.0)]
    );
    assert_eq!(store.current_temperature(), 29.0);
}

#[test]
fn test_advance_clamps_to_configured_bounds() {
    let now = Local::now();
    let mut store = SeriesStore::seeded(
        test_config(),
        Thresholds::default(),
        &[49.0],
        // In the elevated regime, force a jitter step of +variation/4
        Box::new(ScriptedNoise::new(&[0.99, 1.0])),
        now,
    );
    let next = store.advance(now);
    assert_eq!(next, 50.0, "raw 54.0 must clamp to max_temp");
}

#[test]
fn test_repeated_resets_keep_single_window() {
    let now = Local::now();
    let mut store = SeriesStore::new(test_config(), Thresholds::default());
    for _ in 0..3 {
        store.reset(now);
        assert_eq!(store.len(), 5);
        assert_eq!(store.oldest().map(|s| s.index), Some(0));
    }
}

#[test]
fn test_status_color_and_legend_agree() {
    let thresholds = Thresholds::default();
    let entries = thresholds.legend_entries();
    assert_eq!(entries.len(), 3);

    for t in [-5.0, 12.0, 29.999, 30.0, 34.999, 35.0, 47.5] {
        let class = thresholds.class(t);
        let status = thresholds.status(t);
        assert_eq!(status.class(), class);
        // Every classified reading is representable in the legend
        assert!(entries.iter().any(|e| e.class == class));
    }
}

#[test]
fn test_csv_export_of_known_buffer() {
    let now = Local.with_ymd_and_hms(2026, 8, 30, 9, 30, 10).single().unwrap();
    let store = SeriesStore::seeded(
        test_config(),
        Thresholds::default(),
        &[25.0, 31.5, 36.25],
        Box::new(ScriptedNoise::new(&[])),
        now,
    );

    let csv = export::csv_string(&store.snapshot(), store.thresholds());
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Time,Temperature (\u{b0}C),Status");
    assert_eq!(lines[1], "09:30:08,25.00,normal");
    assert_eq!(lines[2], "09:30:09,31.50,warning-high");
    assert_eq!(lines[3], "09:30:10,36.25,danger");
}

#[test]
fn test_export_files_round_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let now = Local::now();
    let store = SeriesStore::seeded(
        test_config(),
        Thresholds::default(),
        &[20.0, 33.0, 37.0],
        Box::new(ScriptedNoise::new(&[])),
        now,
    );
    let samples = store.snapshot();

    let csv_path = dir.path().join("log.csv");
    export::write_series(&csv_path, ExportFormat::Csv, &samples, store.thresholds()).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("Time,"));
    assert_eq!(csv.lines().count(), 4);

    let json_path = dir.path().join("log.json");
    export::write_series(&json_path, ExportFormat::Json, &samples, store.thresholds()).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    let records = parsed.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1]["status"], "warning-high");
    assert_eq!(records[2]["status"], "danger");
}

#[test]
fn test_curve_color_follows_latest_reading() {
    let thresholds = Thresholds::default();
    let now = Local::now();
    let mut store = SeriesStore::seeded(
        test_config(),
        thresholds,
        &[20.0, 22.0, 24.0],
        // Push the next value into the warning band: 24 + (1.0 - 0.5)*20 = 34
        Box::new(ScriptedNoise::new(&[1.0])),
        now,
    );
    assert_eq!(thresholds.class(store.current_temperature()), TempClass::Normal);
    store.advance(now);
    assert_eq!(thresholds.class(store.current_temperature()), TempClass::Warning);
}

proptest! {
    #[test]
    fn prop_invariants_hold_for_any_run(
        capacity in 2usize..80,
        advances in 0usize..200,
        min_temp in -50.0f64..0.0,
        max_temp in 10.0f64..60.0,
        variation in 1.0f64..30.0,
    ) {
        let config = SeriesConfig {
            min_temp,
            max_temp,
            capacity,
            variation,
            ..Default::default()
        };
        prop_assert!(config.validate().is_ok());

        let mut store = SeriesStore::new(config, Thresholds::default());
        for _ in 0..advances {
            store.advance(Local::now());
        }

        // Capacity invariant
        prop_assert_eq!(store.len(), capacity);

        // Clamp invariant for every buffered sample
        for s in store.iter() {
            prop_assert!(s.temperature >= min_temp && s.temperature <= max_temp);
        }

        // Contiguous, never-reused indices (variant with carried-forward index)
        let indices: Vec<u64> = store.iter().map(|s| s.index).collect();
        for pair in indices.windows(2) {
            prop_assert_eq!(pair[1], pair[0] + 1);
        }
        prop_assert_eq!(
            indices[indices.len() - 1],
            (capacity + advances - 1) as u64
        );

        // Current temperature tracks the last sample
        prop_assert_eq!(
            store.current_temperature(),
            store.latest().map(|s| s.temperature).unwrap()
        );
    }
}
