//! Temperature classification against ordered thresholds
//!
//! The classifier is the single source of truth for the coloring of the
//! curve and markers, the status text, the status-indicator tag, and the
//! legend ranges. All of it derives from one [`Thresholds`] value so the
//! pieces can never disagree.
//!
//! # Scheme
//!
//! The default scheme is single-sided on the high end with inclusive lower
//! bounds: `t >= 35 -> danger`, `30 <= t < 35 -> warning`, `t < 30 ->
//! normal`. A double-sided scheme is a configuration change: setting
//! [`Thresholds::warn_low`] adds a low-side warning band (`t <= warn_low`)
//! and makes [`TempStatus::WarningLow`] reachable.

use egui::Color32;
use serde::{Deserialize, Serialize};

/// Classification of a temperature reading, driving color and indicator tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TempClass {
    /// Below the warning band
    Normal,
    /// Inside the warning band
    Warning,
    /// At or beyond the danger threshold
    Danger,
}

impl TempClass {
    /// Color used for the curve, markers, and value text
    pub fn color(&self) -> Color32 {
        match self {
            TempClass::Normal => Color32::from_rgb(46, 204, 113), // Emerald green
            TempClass::Warning => Color32::from_rgb(243, 156, 18), // Amber
            TempClass::Danger => Color32::from_rgb(231, 76, 60),  // Red
        }
    }

    /// Discrete state tag for the status-indicator slot
    pub fn tag(&self) -> &'static str {
        match self {
            TempClass::Normal => "normal",
            TempClass::Warning => "warning",
            TempClass::Danger => "danger",
        }
    }

    /// Display name for the legend
    pub fn display_name(&self) -> &'static str {
        match self {
            TempClass::Normal => "Normal",
            TempClass::Warning => "Warning",
            TempClass::Danger => "Danger",
        }
    }

    /// All classes in legend order
    pub fn all() -> &'static [TempClass] {
        &[TempClass::Normal, TempClass::Warning, TempClass::Danger]
    }
}

/// Status label for a temperature reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TempStatus {
    Normal,
    /// Warning band entered from the high side
    WarningHigh,
    /// Warning band entered from the low side (only with a low bound set)
    WarningLow,
    Danger,
}

impl TempStatus {
    /// Machine-readable status label
    pub fn label(&self) -> &'static str {
        match self {
            TempStatus::Normal => "normal",
            TempStatus::WarningHigh => "warning-high",
            TempStatus::WarningLow => "warning-low",
            TempStatus::Danger => "danger",
        }
    }

    /// Human-readable status text for the display sink
    pub fn display_text(&self) -> &'static str {
        match self {
            TempStatus::Normal => "Normal",
            TempStatus::WarningHigh => "Warning: High",
            TempStatus::WarningLow => "Warning: Low",
            TempStatus::Danger => "Danger",
        }
    }

    /// The class this status belongs to
    pub fn class(&self) -> TempClass {
        match self {
            TempStatus::Normal => TempClass::Normal,
            TempStatus::WarningHigh | TempStatus::WarningLow => TempClass::Warning,
            TempStatus::Danger => TempClass::Danger,
        }
    }
}

impl std::fmt::Display for TempStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the chart legend: a class swatch plus its threshold range
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub class: TempClass,
    pub range_text: String,
}

/// Ordered classification thresholds
///
/// High-side bounds are inclusive (`>=`); the optional low bound is
/// inclusive on its side (`<=`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Lower bound of the warning band
    pub warn_high: f64,
    /// Lower bound of the danger band
    pub danger_high: f64,
    /// Optional upper bound of a low-side warning band
    pub warn_low: Option<f64>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warn_high: 30.0,
            danger_high: 35.0,
            warn_low: None,
        }
    }
}

impl Thresholds {
    /// Classify a temperature into a color class
    pub fn class(&self, t: f64) -> TempClass {
        if t >= self.danger_high {
            TempClass::Danger
        } else if t >= self.warn_high {
            TempClass::Warning
        } else if self.warn_low.is_some_and(|low| t <= low) {
            TempClass::Warning
        } else {
            TempClass::Normal
        }
    }

    /// Classify a temperature into a status label
    pub fn status(&self, t: f64) -> TempStatus {
        if t >= self.danger_high {
            TempStatus::Danger
        } else if t >= self.warn_high {
            TempStatus::WarningHigh
        } else if self.warn_low.is_some_and(|low| t <= low) {
            TempStatus::WarningLow
        } else {
            TempStatus::Normal
        }
    }

    /// Whether the next-value generator is in the elevated regime
    ///
    /// The regime boundary is strict (`>`), unlike classification which is
    /// inclusive at the danger threshold.
    pub fn elevated(&self, t: f64) -> bool {
        t > self.danger_high
    }

    /// Legend rows matching the active scheme, one per class in order
    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        TempClass::all()
            .iter()
            .map(|&class| LegendEntry {
                class,
                range_text: self.range_text(class),
            })
            .collect()
    }

    /// The threshold range covered by a class, as legend text
    fn range_text(&self, class: TempClass) -> String {
        match class {
            TempClass::Normal => match self.warn_low {
                Some(low) => format!(
                    "{}\u{2013}{} \u{b0}C",
                    fmt_temp(low),
                    fmt_temp(self.warn_high)
                ),
                None => format!("< {} \u{b0}C", fmt_temp(self.warn_high)),
            },
            TempClass::Warning => match self.warn_low {
                Some(low) => format!(
                    "\u{2265} {} or \u{2264} {} \u{b0}C",
                    fmt_temp(self.warn_high),
                    fmt_temp(low)
                ),
                None => format!(
                    "{}\u{2013}{} \u{b0}C",
                    fmt_temp(self.warn_high),
                    fmt_temp(self.danger_high)
                ),
            },
            TempClass::Danger => format!("\u{2265} {} \u{b0}C", fmt_temp(self.danger_high)),
        }
    }
}

/// Format a threshold without a trailing ".0" for whole numbers
fn fmt_temp(t: f64) -> String {
    if t.fract() == 0.0 {
        format!("{:.0}", t)
    } else {
        format!("{}", t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_boundaries() {
        let th = Thresholds::default();
        assert_eq!(th.class(35.0), TempClass::Danger);
        assert_eq!(th.class(34.999), TempClass::Warning);
        assert_eq!(th.class(30.0), TempClass::Warning);
        assert_eq!(th.class(29.999), TempClass::Normal);
        assert_eq!(th.class(-10.0), TempClass::Normal);
        assert_eq!(th.class(100.0), TempClass::Danger);
    }

    #[test]
    fn test_status_matches_class() {
        let th = Thresholds::default();
        for t in [-5.0, 0.0, 29.9, 30.0, 34.9, 35.0, 48.0] {
            assert_eq!(th.status(t).class(), th.class(t));
        }
    }

    #[test]
    fn test_classifier_is_deterministic() {
        let th = Thresholds::default();
        let t = 31.7;
        assert_eq!(th.class(t), th.class(t));
        assert_eq!(th.status(t), th.status(t));
    }

    #[test]
    fn test_warning_low_band() {
        let th = Thresholds {
            warn_high: 35.0,
            danger_high: 40.0,
            warn_low: Some(0.0),
        };
        assert_eq!(th.status(-1.0), TempStatus::WarningLow);
        assert_eq!(th.status(0.0), TempStatus::WarningLow);
        assert_eq!(th.status(0.001), TempStatus::Normal);
        assert_eq!(th.status(35.0), TempStatus::WarningHigh);
        assert_eq!(th.status(40.0), TempStatus::Danger);
        assert_eq!(th.class(-1.0), TempClass::Warning);
    }

    #[test]
    fn test_elevated_regime_is_strict() {
        let th = Thresholds::default();
        assert!(!th.elevated(35.0));
        assert!(th.elevated(35.001));
    }

    #[test]
    fn test_legend_text_follows_thresholds() {
        let th = Thresholds::default();
        let entries = th.legend_entries();
        assert_eq!(entries.len(), TempClass::all().len());
        let order: Vec<TempClass> = entries.iter().map(|e| e.class).collect();
        assert_eq!(order, TempClass::all().to_vec());
        assert_eq!(entries[0].class, TempClass::Normal);
        assert!(entries[0].range_text.contains("30"));
        assert!(entries[1].range_text.contains("30"));
        assert!(entries[1].range_text.contains("35"));
        assert!(entries[2].range_text.contains("35"));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(TempStatus::Normal.label(), "normal");
        assert_eq!(TempStatus::WarningHigh.label(), "warning-high");
        assert_eq!(TempStatus::WarningLow.label(), "warning-low");
        assert_eq!(TempStatus::Danger.label(), "danger");
        assert_eq!(TempClass::Warning.tag(), "warning");
    }
}
