//! Ideal-weight consensus from six published formulas
//!
//! Four linear formulas over inches above five feet:
//!
//! | Formula  | Men (kg)        | Women (kg)      |
//! |----------|-----------------|-----------------|
//! | Hamwi    | 48.0 + 2.70/in  | 45.5 + 2.20/in  |
//! | Devine   | 50.0 + 2.30/in  | 45.5 + 2.30/in  |
//! | Robinson | 52.0 + 1.90/in  | 49.0 + 1.70/in  |
//! | Miller   | 56.2 + 1.41/in  | 53.1 + 1.36/in  |
//!
//! plus the weight at BMI 21.7 (midpoint of 18.5 and 24.9) and Peterson's
//! 2016 equation evaluated at the same BMI, scaled by 0.9 for women.
//! Heights below five feet are extrapolated linearly, not clamped.

use crate::models::{Diagnostic, DiagnosticKind, Gender, UnitSystem, WeightRange};
use crate::units::{round_dp, UnitConverter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const INCHES_AT_FIVE_FEET: f64 = 60.0;

/// Midpoint of the healthy BMI band
const TARGET_BMI: f64 = 21.7;

/// Height separating the short and tall wrist-size tables
const FRAME_HEIGHT_GATE_INCHES: f64 = 65.0;

/// Frame-size adjustment applied to the averaged weight
const FRAME_ADJUSTMENT_KG: f64 = 0.9;

/// Consensus range spread around the unadjusted average
const RANGE_SPREAD: f64 = 0.10;

/// Skeletal frame size derived from wrist circumference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameSize {
    Small,
    Medium,
    Large,
}

impl Default for FrameSize {
    fn default() -> Self {
        FrameSize::Medium
    }
}

impl FrameSize {
    pub fn adjustment_kg(&self) -> f64 {
        match self {
            FrameSize::Small => -FRAME_ADJUSTMENT_KG,
            FrameSize::Medium => 0.0,
            FrameSize::Large => FRAME_ADJUSTMENT_KG,
        }
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameSize::Small => write!(f, "small"),
            FrameSize::Medium => write!(f, "medium"),
            FrameSize::Large => write!(f, "large"),
        }
    }
}

impl FromStr for FrameSize {
    type Err = crate::error::VitalsError;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "small" | "s" => Ok(FrameSize::Small),
            "medium" | "m" => Ok(FrameSize::Medium),
            "large" | "l" => Ok(FrameSize::Large),
            _ => Err(crate::error::VitalsError::parse("frame size", s)),
        }
    }
}

/// Wrist cut points in inches: (upper bound of small, upper bound of medium)
struct WristCutPoints {
    small_below: f64,
    medium_up_to: f64,
}

const FEMALE_SHORT_CUTS: WristCutPoints = WristCutPoints { small_below: 6.0, medium_up_to: 6.25 };
const FEMALE_TALL_CUTS: WristCutPoints = WristCutPoints { small_below: 6.25, medium_up_to: 6.5 };
const MALE_SHORT_CUTS: WristCutPoints = WristCutPoints { small_below: 6.0, medium_up_to: 7.0 };
const MALE_TALL_CUTS: WristCutPoints = WristCutPoints { small_below: 6.5, medium_up_to: 7.5 };

/// Output of each individual formula, in kilograms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormulaEstimates {
    pub hamwi: f64,
    pub devine: f64,
    pub robinson: f64,
    pub miller: f64,
    pub bmi_midpoint: f64,
    pub peterson: f64,
}

impl FormulaEstimates {
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.hamwi,
            self.devine,
            self.robinson,
            self.miller,
            self.bmi_midpoint,
            self.peterson,
        ]
    }

    pub fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("Hamwi", self.hamwi),
            ("Devine", self.devine),
            ("Robinson", self.robinson),
            ("Miller", self.miller),
            ("BMI 21.7", self.bmi_midpoint),
            ("Peterson", self.peterson),
        ]
    }

    pub fn average(&self) -> f64 {
        self.as_array().iter().sum::<f64>() / 6.0
    }

    fn rounded(&self) -> Self {
        Self {
            hamwi: round_dp(self.hamwi, 1),
            devine: round_dp(self.devine, 1),
            robinson: round_dp(self.robinson, 1),
            miller: round_dp(self.miller, 1),
            bmi_midpoint: round_dp(self.bmi_midpoint, 1),
            peterson: round_dp(self.peterson, 1),
        }
    }
}

/// Consensus ideal weight; every weight is in kilograms, one decimal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealWeightResult {
    pub formulas: FormulaEstimates,
    /// Plain mean of the six formulas
    pub average: f64,
    pub frame_size: FrameSize,
    pub frame_adjustment: f64,
    /// Mean plus the frame adjustment
    pub adjusted_average: f64,
    pub range: WeightRange,
    /// `range` expressed in pounds
    pub range_lb: WeightRange,
    pub diagnostics: Vec<Diagnostic>,
}

/// Ideal-weight calculation utilities
pub struct IdealWeightCalculator;

impl IdealWeightCalculator {
    /// Evaluate all six formulas for a height in `system` units
    pub fn formulas(height: f64, gender: Gender, system: UnitSystem) -> FormulaEstimates {
        let inches = UnitConverter::normalize_length_to_inches(height, system);
        let meters = UnitConverter::inches_to_cm(inches) / 100.0;
        let over = inches - INCHES_AT_FIVE_FEET;

        let bmi_midpoint = TARGET_BMI * meters * meters;
        let peterson = 2.2 * TARGET_BMI + 3.5 * TARGET_BMI * (meters - 1.5);

        match gender {
            Gender::Male => FormulaEstimates {
                hamwi: 48.0 + 2.7 * over,
                devine: 50.0 + 2.3 * over,
                robinson: 52.0 + 1.9 * over,
                miller: 56.2 + 1.41 * over,
                bmi_midpoint,
                peterson,
            },
            Gender::Female => FormulaEstimates {
                hamwi: 45.5 + 2.2 * over,
                devine: 45.5 + 2.3 * over,
                robinson: 49.0 + 1.7 * over,
                miller: 53.1 + 1.36 * over,
                bmi_midpoint,
                peterson: peterson * 0.9,
            },
        }
    }

    /// Classify frame size from wrist circumference and height (both in `system` units)
    pub fn frame_size(wrist: f64, gender: Gender, height: f64, system: UnitSystem) -> FrameSize {
        let wrist_in = UnitConverter::normalize_length_to_inches(wrist, system);
        let height_in = UnitConverter::normalize_length_to_inches(height, system);
        let tall = height_in > FRAME_HEIGHT_GATE_INCHES;

        let cuts = match (gender, tall) {
            (Gender::Female, false) => &FEMALE_SHORT_CUTS,
            (Gender::Female, true) => &FEMALE_TALL_CUTS,
            (Gender::Male, false) => &MALE_SHORT_CUTS,
            (Gender::Male, true) => &MALE_TALL_CUTS,
        };

        if wrist_in < cuts.small_below {
            FrameSize::Small
        } else if wrist_in <= cuts.medium_up_to {
            FrameSize::Medium
        } else {
            FrameSize::Large
        }
    }

    /// Consensus ideal weight
    ///
    /// The ±10% range is taken around the unadjusted average and the frame
    /// offset is then added to both bounds.
    pub fn calculate(
        height: f64,
        gender: Gender,
        age: u32,
        frame_size: FrameSize,
        system: UnitSystem,
    ) -> IdealWeightResult {
        let formulas = Self::formulas(height, gender, system);
        let average = formulas.average();
        let adjustment = frame_size.adjustment_kg();

        let min = average * (1.0 - RANGE_SPREAD) + adjustment;
        let max = average * (1.0 + RANGE_SPREAD) + adjustment;

        let mut diagnostics = Vec::new();
        if age < 18 {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::OutsideReferencePopulation,
                format!("ideal-weight formulas are derived for adults, age {} given", age),
            ));
        }

        tracing::debug!(average, %frame_size, "Ideal weight consensus calculated");

        IdealWeightResult {
            formulas: formulas.rounded(),
            average: round_dp(average, 1),
            frame_size,
            frame_adjustment: adjustment,
            adjusted_average: round_dp(average + adjustment, 1),
            range: WeightRange {
                min: round_dp(min, 1),
                max: round_dp(max, 1),
            },
            range_lb: WeightRange {
                min: UnitConverter::metric_to_imperial_weight(min),
                max: UnitConverter::metric_to_imperial_weight(max),
            },
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_male_formulas() {
        let f = IdealWeightCalculator::formulas(175.0, Gender::Male, UnitSystem::Metric).rounded();
        assert_eq!(f.hamwi, 72.0);
        assert_eq!(f.devine, 70.5);
        assert_eq!(f.robinson, 68.9);
        assert_eq!(f.miller, 68.7);
        assert_eq!(f.bmi_midpoint, 66.5);
        assert_eq!(f.peterson, 66.7);
    }

    #[test]
    fn test_female_formulas() {
        let f = IdealWeightCalculator::formulas(165.0, Gender::Female, UnitSystem::Metric).rounded();
        assert_eq!(f.hamwi, 56.4);
        assert_eq!(f.devine, 56.9);
        assert_eq!(f.robinson, 57.4);
        assert_eq!(f.miller, 59.8);
        assert_eq!(f.bmi_midpoint, 59.1);
        assert_eq!(f.peterson, 53.2);
    }

    #[test]
    fn test_medium_frame_consensus() {
        let result = IdealWeightCalculator::calculate(175.0, Gender::Male, 30, FrameSize::Medium, UnitSystem::Metric);
        assert_eq!(result.average, 68.9);
        assert_eq!(result.adjusted_average, 68.9);
        assert_eq!(result.range, WeightRange { min: 62.0, max: 75.8 });
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_frame_offset_applied_after_percentage() {
        let large = IdealWeightCalculator::calculate(175.0, Gender::Male, 30, FrameSize::Large, UnitSystem::Metric);
        assert_eq!(large.adjusted_average, 69.8);
        assert_eq!(large.range, WeightRange { min: 62.9, max: 76.7 });

        let small = IdealWeightCalculator::calculate(175.0, Gender::Male, 30, FrameSize::Small, UnitSystem::Metric);
        assert_eq!(small.adjusted_average, 68.0);
        assert_eq!(small.range, WeightRange { min: 61.1, max: 74.9 });
    }

    #[test]
    fn test_imperial_height_matches_metric() {
        let metric = IdealWeightCalculator::calculate(175.26, Gender::Female, 40, FrameSize::Medium, UnitSystem::Metric);
        let imperial = IdealWeightCalculator::calculate(69.0, Gender::Female, 40, FrameSize::Medium, UnitSystem::Imperial);
        assert_eq!(metric.average, imperial.average);
        assert!(imperial.range_lb.min > imperial.range.min);
    }

    #[test]
    fn test_minor_gets_diagnostic() {
        let result = IdealWeightCalculator::calculate(160.0, Gender::Female, 15, FrameSize::Medium, UnitSystem::Metric);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::OutsideReferencePopulation);
    }

    #[test]
    fn test_frame_size_classification() {
        // Tall man: cut points 6.5 / 7.5 inches
        assert_eq!(IdealWeightCalculator::frame_size(16.0, Gender::Male, 175.0, UnitSystem::Metric), FrameSize::Small);
        assert_eq!(IdealWeightCalculator::frame_size(17.0, Gender::Male, 175.0, UnitSystem::Metric), FrameSize::Medium);
        assert_eq!(IdealWeightCalculator::frame_size(19.5, Gender::Male, 175.0, UnitSystem::Metric), FrameSize::Large);

        // Short woman: cut points 6.0 / 6.25 inches
        assert_eq!(IdealWeightCalculator::frame_size(15.0, Gender::Female, 160.0, UnitSystem::Metric), FrameSize::Small);
        assert_eq!(IdealWeightCalculator::frame_size(15.5, Gender::Female, 160.0, UnitSystem::Metric), FrameSize::Medium);
        assert_eq!(IdealWeightCalculator::frame_size(16.5, Gender::Female, 160.0, UnitSystem::Metric), FrameSize::Large);

        // Height gate: 65 inches exactly is still the short table
        assert_eq!(IdealWeightCalculator::frame_size(6.2, Gender::Female, 65.0, UnitSystem::Imperial), FrameSize::Medium);
        assert_eq!(IdealWeightCalculator::frame_size(6.2, Gender::Female, 66.0, UnitSystem::Imperial), FrameSize::Small);
    }

    #[test]
    fn test_frame_size_parsing() {
        assert_eq!("Large".parse::<FrameSize>().unwrap(), FrameSize::Large);
        assert!("huge".parse::<FrameSize>().is_err());
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_range_brackets_adjusted_average(
            height in 140.0f64..210.0,
            age in 18u32..90,
            female in any::<bool>(),
            frame in 0usize..3
        ) {
            let gender = if female { Gender::Female } else { Gender::Male };
            let frame = [FrameSize::Small, FrameSize::Medium, FrameSize::Large][frame];
            let result = IdealWeightCalculator::calculate(height, gender, age, frame, UnitSystem::Metric);

            prop_assert!(result.range.min < result.adjusted_average);
            prop_assert!(result.adjusted_average < result.range.max);
        }
    }
}
