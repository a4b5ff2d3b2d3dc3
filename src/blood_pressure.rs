//! Blood-pressure classification and reading-log analysis
//!
//! Categories follow the ACC/AHA 2017 guideline, evaluated top to bottom:
//!
//! | Category             | Rule                              |
//! |----------------------|-----------------------------------|
//! | Low                  | systolic < 90 OR diastolic < 60   |
//! | Normal               | systolic < 120 AND diastolic < 80 |
//! | Elevated             | systolic < 130 AND diastolic < 80 |
//! | Hypertension Stage 1 | systolic < 140 OR diastolic < 90  |
//! | Hypertension Stage 2 | systolic < 180 OR diastolic < 120 |
//! | Hypertensive Crisis  | otherwise                         |
//!
//! One high value is enough to escalate; both values must be low to
//! de-escalate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fmt;

use crate::units::{round_dp, round_whole};

/// Ordinal blood-pressure category, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodPressureCategory {
    Low,
    Normal,
    Elevated,
    HypertensionStage1,
    HypertensionStage2,
    HypertensiveCrisis,
}

impl BloodPressureCategory {
    pub const ALL: [BloodPressureCategory; 6] = [
        BloodPressureCategory::Low,
        BloodPressureCategory::Normal,
        BloodPressureCategory::Elevated,
        BloodPressureCategory::HypertensionStage1,
        BloodPressureCategory::HypertensionStage2,
        BloodPressureCategory::HypertensiveCrisis,
    ];

    pub fn label(&self) -> &'static str {
        BP_NARRATIVES[*self as usize].0
    }

    pub fn description(&self) -> &'static str {
        BP_NARRATIVES[*self as usize].1
    }

    pub fn color(&self) -> &'static str {
        BP_NARRATIVES[*self as usize].2
    }
}

impl fmt::Display for BloodPressureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// (label, description, color), indexed by `BloodPressureCategory` ordinal
static BP_NARRATIVES: [(&str, &str, &str); 6] = [
    (
        "Low Blood Pressure",
        "Your blood pressure is lower than normal. If you feel dizzy or faint, consult a healthcare provider.",
        "blue",
    ),
    (
        "Normal",
        "Your blood pressure is in the healthy range. Keep up your current lifestyle.",
        "green",
    ),
    (
        "Elevated",
        "Your blood pressure is elevated. Lifestyle changes can help prevent hypertension.",
        "yellow",
    ),
    (
        "Hypertension Stage 1",
        "Stage 1 hypertension. Discuss lifestyle changes and possible treatment with your doctor.",
        "orange",
    ),
    (
        "Hypertension Stage 2",
        "Stage 2 hypertension. Medical treatment is usually recommended; consult your doctor.",
        "red",
    ),
    (
        "Hypertensive Crisis",
        "Hypertensive crisis. Seek emergency medical care immediately.",
        "darkred",
    ),
];

/// Single logged blood-pressure measurement (mmHg, pulse in bpm)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureReading {
    pub systolic: u16,
    pub diastolic: u16,
    pub pulse: Option<u16>,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
}

impl BloodPressureReading {
    pub fn new(systolic: u16, diastolic: u16, timestamp: DateTime<Utc>) -> Self {
        Self {
            systolic,
            diastolic,
            pulse: None,
            timestamp,
            notes: None,
        }
    }

    pub fn with_pulse(mut self, pulse: u16) -> Self {
        self.pulse = Some(pulse);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn category(&self) -> BloodPressureCategory {
        BloodPressureAnalyzer::classify(self.systolic as f64, self.diastolic as f64)
    }
}

/// Derived metrics for one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingAnalysis {
    pub systolic: f64,
    pub diastolic: f64,
    pub category: BloodPressureCategory,
    pub label: String,
    pub description: String,
    pub color: String,
    pub mean_arterial_pressure: i32,
    pub pulse_pressure: f64,
}

/// Min / max / mean / sample standard deviation of one measurement series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

impl SeriesStats {
    fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        // Sample standard deviation is undefined for a single value
        let std_dev = if values.len() < 2 {
            0.0
        } else {
            values.iter().std_dev()
        };

        Some(Self {
            mean: round_dp(values.iter().mean(), 1),
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
            std_dev: round_dp(std_dev, 1),
        })
    }
}

/// Aggregate view over a reading log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureSummary {
    pub count: usize,
    pub systolic: SeriesStats,
    pub diastolic: SeriesStats,
    /// Present only when at least one reading carries a pulse
    pub pulse: Option<SeriesStats>,
    pub average: ReadingAnalysis,
    pub first_reading: DateTime<Utc>,
    pub last_reading: DateTime<Utc>,
}

/// Blood-pressure utilities
pub struct BloodPressureAnalyzer;

impl BloodPressureAnalyzer {
    pub fn classify(systolic: f64, diastolic: f64) -> BloodPressureCategory {
        if systolic < 90.0 || diastolic < 60.0 {
            BloodPressureCategory::Low
        } else if systolic < 120.0 && diastolic < 80.0 {
            BloodPressureCategory::Normal
        } else if systolic < 130.0 && diastolic < 80.0 {
            BloodPressureCategory::Elevated
        } else if systolic < 140.0 || diastolic < 90.0 {
            BloodPressureCategory::HypertensionStage1
        } else if systolic < 180.0 || diastolic < 120.0 {
            BloodPressureCategory::HypertensionStage2
        } else {
            BloodPressureCategory::HypertensiveCrisis
        }
    }

    /// MAP = (systolic + 2 × diastolic) / 3, rounded
    pub fn mean_arterial_pressure(systolic: f64, diastolic: f64) -> i32 {
        round_whole((systolic + 2.0 * diastolic) / 3.0) as i32
    }

    pub fn pulse_pressure(systolic: f64, diastolic: f64) -> f64 {
        systolic - diastolic
    }

    pub fn analyze(systolic: f64, diastolic: f64) -> ReadingAnalysis {
        let category = Self::classify(systolic, diastolic);
        ReadingAnalysis {
            systolic,
            diastolic,
            category,
            label: category.label().to_string(),
            description: category.description().to_string(),
            color: category.color().to_string(),
            mean_arterial_pressure: Self::mean_arterial_pressure(systolic, diastolic),
            pulse_pressure: Self::pulse_pressure(systolic, diastolic),
        }
    }

    pub fn analyze_reading(reading: &BloodPressureReading) -> ReadingAnalysis {
        Self::analyze(reading.systolic as f64, reading.diastolic as f64)
    }

    /// Mean systolic and diastolic over all readings; `None` for an empty log
    pub fn average(readings: &[BloodPressureReading]) -> Option<(f64, f64)> {
        if readings.is_empty() {
            return None;
        }
        let systolic = readings.iter().map(|r| r.systolic as f64).mean();
        let diastolic = readings.iter().map(|r| r.diastolic as f64).mean();
        Some((systolic, diastolic))
    }

    /// Mean pulse over the readings that carry one
    pub fn average_pulse(readings: &[BloodPressureReading]) -> Option<f64> {
        let pulses: Vec<f64> = readings.iter().filter_map(|r| r.pulse).map(f64::from).collect();
        if pulses.is_empty() {
            None
        } else {
            Some(pulses.iter().mean())
        }
    }

    pub fn summarize(readings: &[BloodPressureReading]) -> Option<BloodPressureSummary> {
        let systolic: Vec<f64> = readings.iter().map(|r| r.systolic as f64).collect();
        let diastolic: Vec<f64> = readings.iter().map(|r| r.diastolic as f64).collect();
        let pulses: Vec<f64> = readings.iter().filter_map(|r| r.pulse).map(f64::from).collect();

        let systolic = SeriesStats::from_values(&systolic)?;
        let diastolic = SeriesStats::from_values(&diastolic)?;
        let first_reading = readings.iter().map(|r| r.timestamp).min()?;
        let last_reading = readings.iter().map(|r| r.timestamp).max()?;

        // Classify the unrounded means; SeriesStats is rounded for display
        let (mean_systolic, mean_diastolic) = Self::average(readings)?;
        let average = Self::analyze(mean_systolic, mean_diastolic);

        tracing::debug!(
            count = readings.len(),
            category = %average.category,
            "Blood pressure log summarized"
        );

        Some(BloodPressureSummary {
            count: readings.len(),
            systolic,
            diastolic,
            pulse: SeriesStats::from_values(&pulses),
            average,
            first_reading,
            last_reading,
        })
    }

    pub fn filter_by_category(
        readings: &[BloodPressureReading],
        category: BloodPressureCategory,
    ) -> Vec<&BloodPressureReading> {
        readings.iter().filter(|r| r.category() == category).collect()
    }

    /// Readings with `start <= timestamp <= end`
    pub fn filter_by_date_range(
        readings: &[BloodPressureReading],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<&BloodPressureReading> {
        readings
            .iter()
            .filter(|r| r.timestamp >= start && r.timestamp <= end)
            .collect()
    }

    /// Readings classified strictly above `category`
    pub fn readings_above(
        readings: &[BloodPressureReading],
        category: BloodPressureCategory,
    ) -> Vec<&BloodPressureReading> {
        readings.iter().filter(|r| r.category() > category).collect()
    }
}
