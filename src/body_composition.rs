//! Body-fat estimation
//!
//! Two interchangeable methods:
//!
//! - **U.S. Navy method** (Hodgdon & Beckett, 1984), circumferences in cm:
//!   - Men: `495 / (1.0324 - 0.19077·log10(waist - neck) + 0.15456·log10(height)) - 450`
//!   - Women: `495 / (1.29579 - 0.35004·log10(waist + hip - neck) + 0.22100·log10(height)) - 450`
//! - **BMI method** (Deurenberg, 1991):
//!   - Men: `1.20·BMI + 0.23·age - 16.2`
//!   - Women: `1.20·BMI + 0.23·age - 5.4`
//!
//! Infeasible inputs (a non-positive logarithm argument, a missing
//! measurement) yield 0 together with a diagnostic explaining why.

use crate::bmi::BmiCalculator;
use crate::error::{Result, ValidationError};
use crate::models::{require_positive, Diagnostic, DiagnosticKind, Gender, UnitSystem};
use crate::units::{round_dp, UnitConverter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Estimation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFatMethod {
    Navy,
    Bmi,
}

impl fmt::Display for BodyFatMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyFatMethod::Navy => write!(f, "U.S. Navy"),
            BodyFatMethod::Bmi => write!(f, "BMI"),
        }
    }
}

/// Body-fat category, ordered from leanest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BodyFatCategory {
    EssentialFat,
    Athletes,
    Fitness,
    Average,
    AboveAverage,
    Obese,
}

impl BodyFatCategory {
    pub const ALL: [BodyFatCategory; 6] = [
        BodyFatCategory::EssentialFat,
        BodyFatCategory::Athletes,
        BodyFatCategory::Fitness,
        BodyFatCategory::Average,
        BodyFatCategory::AboveAverage,
        BodyFatCategory::Obese,
    ];

    pub fn label(&self) -> &'static str {
        BODY_FAT_NARRATIVES[*self as usize].0
    }

    /// Health narrative shown next to the estimate
    pub fn description(&self) -> &'static str {
        BODY_FAT_NARRATIVES[*self as usize].1
    }
}

impl fmt::Display for BodyFatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// (label, description) indexed by `BodyFatCategory` ordinal
static BODY_FAT_NARRATIVES: [(&str, &str); 6] = [
    (
        "Essential Fat",
        "At or below the minimum needed for basic physiological function. Sustaining this level can impair hormone and immune health.",
    ),
    (
        "Athletes",
        "Typical of competitive athletes. Low fat with high lean mass supports performance.",
    ),
    (
        "Fitness",
        "Typical of people who train regularly. Associated with good metabolic health.",
    ),
    (
        "Average",
        "Within the common range for the general population. Regular activity keeps it stable.",
    ),
    (
        "Above Average",
        "Higher than recommended. Gradual fat loss through diet and exercise lowers metabolic risk.",
    ),
    (
        "Obese",
        "Associated with elevated risk of cardiovascular disease and type 2 diabetes. Consider professional guidance.",
    ),
];

/// Upper bounds (exclusive) of the first five categories
const MALE_THRESHOLDS: [f64; 5] = [6.0, 14.0, 18.0, 25.0, 32.0];
const FEMALE_THRESHOLDS: [f64; 5] = [14.0, 21.0, 25.0, 32.0, 38.0];

/// Healthy body-fat bounds per age bracket: < 20, < 30, < 40, < 50, < 60, >= 60
const MALE_IDEAL_RANGES: [(f64, f64); 6] = [
    (8.0, 17.0),
    (8.0, 19.0),
    (11.0, 21.0),
    (13.0, 23.0),
    (15.0, 24.0),
    (16.0, 25.0),
];
const FEMALE_IDEAL_RANGES: [(f64, f64); 6] = [
    (17.0, 27.0),
    (20.0, 28.0),
    (21.0, 30.0),
    (23.0, 32.0),
    (25.0, 34.0),
    (26.0, 36.0),
];

/// Healthy body-fat band in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyFatRange {
    pub min: f64,
    pub max: f64,
}

/// Circumference measurements normalized to centimeters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircumferenceMeasurements {
    pub waist_cm: f64,
    pub neck_cm: f64,
    /// Required by the Navy method for women only
    pub hip_cm: Option<f64>,
    pub height_cm: f64,
}

impl CircumferenceMeasurements {
    /// Validate and normalize measurements entered in `system` units
    pub fn new(waist: f64, neck: f64, hip: Option<f64>, height: f64, system: UnitSystem) -> Result<Self> {
        require_positive("waist", waist)?;
        require_positive("neck", neck)?;
        require_positive("height", height)?;
        if let Some(hip) = hip {
            require_positive("hip", hip)?;
        }

        Ok(Self {
            waist_cm: UnitConverter::normalize_length_to_cm(waist, system),
            neck_cm: UnitConverter::normalize_length_to_cm(neck, system),
            hip_cm: hip.map(|h| UnitConverter::normalize_length_to_cm(h, system)),
            height_cm: UnitConverter::normalize_length_to_cm(height, system),
        })
    }

    /// Fail early when the Navy method for `gender` cannot run on these values
    pub fn require_complete_for(&self, gender: Gender) -> Result<()> {
        if gender == Gender::Female && self.hip_cm.is_none() {
            return Err(ValidationError::Missing {
                field: "hip".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Raw estimate plus any diagnostics produced along the way
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyFatEstimate {
    /// Body fat in percent, one decimal, never negative (0 when infeasible)
    pub percentage: f64,
    pub diagnostics: Vec<Diagnostic>,
}

impl BodyFatEstimate {
    fn value(percentage: f64) -> Self {
        Self {
            percentage: round_dp(percentage.max(0.0), 1),
            diagnostics: Vec::new(),
        }
    }

    fn infeasible(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            percentage: 0.0,
            diagnostics: vec![Diagnostic::new(kind, message)],
        }
    }
}

/// Complete body-fat evaluation ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyFatResult {
    pub method: BodyFatMethod,
    pub percentage: f64,
    pub category: BodyFatCategory,
    pub description: String,
    pub ideal_range: BodyFatRange,
    /// Present when body weight was supplied
    pub fat_mass_kg: Option<f64>,
    pub lean_mass_kg: Option<f64>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Body-fat calculation utilities
pub struct BodyFatCalculator;

impl BodyFatCalculator {
    /// Navy-method estimate from measurements in centimeters
    pub fn navy_body_fat(
        gender: Gender,
        waist_cm: f64,
        neck_cm: f64,
        height_cm: f64,
        hip_cm: Option<f64>,
    ) -> BodyFatEstimate {
        if !(height_cm > 0.0) {
            return BodyFatEstimate::infeasible(
                DiagnosticKind::InfeasibleInput,
                format!("height must be positive, got {}", height_cm),
            );
        }

        let girth = match (gender, hip_cm) {
            (Gender::Male, _) => waist_cm - neck_cm,
            (Gender::Female, Some(hip_cm)) => waist_cm + hip_cm - neck_cm,
            (Gender::Female, None) => {
                return BodyFatEstimate::infeasible(
                    DiagnosticKind::MissingMeasurement,
                    "hip circumference is required for the Navy method for women",
                );
            }
        };

        if !(girth > 0.0) {
            return BodyFatEstimate::infeasible(
                DiagnosticKind::InfeasibleInput,
                format!(
                    "circumference difference must be positive for the logarithm, got {:.1} cm",
                    girth
                ),
            );
        }

        let density = match gender {
            Gender::Male => 1.0324 - 0.19077 * girth.log10() + 0.15456 * height_cm.log10(),
            Gender::Female => 1.29579 - 0.35004 * girth.log10() + 0.22100 * height_cm.log10(),
        };
        if !(density > 0.0) {
            return BodyFatEstimate::infeasible(
                DiagnosticKind::InfeasibleInput,
                "measurements are outside the range the Navy formula supports",
            );
        }

        BodyFatEstimate::value(495.0 / density - 450.0)
    }

    /// BMI-method estimate from an already computed BMI
    pub fn bmi_body_fat(gender: Gender, bmi: f64, age: u32) -> f64 {
        let offset = match gender {
            Gender::Male => 16.2,
            Gender::Female => 5.4,
        };
        round_dp((1.20 * bmi + 0.23 * age as f64 - offset).max(0.0), 1)
    }

    /// Gender-specific six-tier classification
    pub fn classify(body_fat: f64, gender: Gender) -> BodyFatCategory {
        let thresholds = match gender {
            Gender::Male => &MALE_THRESHOLDS,
            Gender::Female => &FEMALE_THRESHOLDS,
        };

        let tier = thresholds
            .iter()
            .position(|&upper| body_fat < upper)
            .unwrap_or(thresholds.len());
        BodyFatCategory::ALL[tier]
    }

    /// Healthy body-fat range for an age bracket
    pub fn ideal_range(gender: Gender, age: u32) -> BodyFatRange {
        let bracket = match age {
            0..=19 => 0,
            20..=29 => 1,
            30..=39 => 2,
            40..=49 => 3,
            50..=59 => 4,
            _ => 5,
        };
        let (min, max) = match gender {
            Gender::Male => MALE_IDEAL_RANGES[bracket],
            Gender::Female => FEMALE_IDEAL_RANGES[bracket],
        };
        BodyFatRange { min, max }
    }

    /// Navy-method evaluation
    pub fn analyze_navy(
        gender: Gender,
        age: u32,
        measurements: &CircumferenceMeasurements,
        weight_kg: Option<f64>,
    ) -> BodyFatResult {
        let estimate = Self::navy_body_fat(
            gender,
            measurements.waist_cm,
            measurements.neck_cm,
            measurements.height_cm,
            measurements.hip_cm,
        );
        Self::build_result(BodyFatMethod::Navy, gender, age, estimate, weight_kg)
    }

    /// BMI-method evaluation from weight and height in `system` units
    pub fn analyze_bmi(gender: Gender, age: u32, weight: f64, height: f64, system: UnitSystem) -> BodyFatResult {
        let bmi = BmiCalculator::compute_bmi(weight, height, system);
        let estimate = if bmi == 0.0 {
            BodyFatEstimate::infeasible(
                DiagnosticKind::InfeasibleInput,
                "weight and height must both be positive",
            )
        } else {
            BodyFatEstimate {
                percentage: Self::bmi_body_fat(gender, bmi, age),
                diagnostics: Vec::new(),
            }
        };

        let weight_kg = (weight > 0.0).then(|| UnitConverter::normalize_weight_to_kg(weight, system));
        Self::build_result(BodyFatMethod::Bmi, gender, age, estimate, weight_kg)
    }

    fn build_result(
        method: BodyFatMethod,
        gender: Gender,
        age: u32,
        estimate: BodyFatEstimate,
        weight_kg: Option<f64>,
    ) -> BodyFatResult {
        let category = Self::classify(estimate.percentage, gender);
        let fat_mass_kg = weight_kg.map(|w| round_dp(w * estimate.percentage / 100.0, 1));
        let lean_mass_kg = weight_kg
            .zip(fat_mass_kg)
            .map(|(w, fat)| round_dp(w - fat, 1));

        tracing::debug!(%method, percentage = estimate.percentage, %category, "Body fat estimated");

        BodyFatResult {
            method,
            percentage: estimate.percentage,
            category,
            description: category.description().to_string(),
            ideal_range: Self::ideal_range(gender, age),
            fat_mass_kg,
            lean_mass_kg,
            diagnostics: estimate.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navy_male() {
        // 495 / (1.0324 - 0.19077·log10(50) + 0.15456·log10(180)) - 450 = 18.37
        let estimate = BodyFatCalculator::navy_body_fat(Gender::Male, 90.0, 40.0, 180.0, None);
        assert!(estimate.diagnostics.is_empty());
        assert!((estimate.percentage - 18.4).abs() < 0.15, "got {}", estimate.percentage);
    }

    #[test]
    fn test_navy_female() {
        let estimate = BodyFatCalculator::navy_body_fat(Gender::Female, 75.0, 33.0, 165.0, Some(100.0));
        assert!(estimate.diagnostics.is_empty());
        assert!(estimate.percentage > 25.0 && estimate.percentage < 35.0, "got {}", estimate.percentage);
    }

    #[test]
    fn test_navy_waist_below_neck_fails_gracefully() {
        let estimate = BodyFatCalculator::navy_body_fat(Gender::Male, 30.0, 35.0, 175.0, None);
        assert_eq!(estimate.percentage, 0.0);
        assert_eq!(estimate.diagnostics[0].kind, DiagnosticKind::InfeasibleInput);

        let estimate = BodyFatCalculator::navy_body_fat(Gender::Male, 35.0, 35.0, 175.0, None);
        assert_eq!(estimate.percentage, 0.0);
    }

    #[test]
    fn test_navy_female_requires_hip() {
        let estimate = BodyFatCalculator::navy_body_fat(Gender::Female, 75.0, 33.0, 165.0, None);
        assert_eq!(estimate.percentage, 0.0);
        assert_eq!(estimate.diagnostics[0].kind, DiagnosticKind::MissingMeasurement);

        let estimate = BodyFatCalculator::navy_body_fat(Gender::Female, 20.0, 50.0, 165.0, Some(25.0));
        assert_eq!(estimate.percentage, 0.0);
        assert_eq!(estimate.diagnostics[0].kind, DiagnosticKind::InfeasibleInput);
    }

    #[test]
    fn test_bmi_method() {
        // 1.2·22.9 + 0.23·30 - 16.2 = 18.18
        assert_eq!(BodyFatCalculator::bmi_body_fat(Gender::Male, 22.9, 30), 18.2);
        // 1.2·22.9 + 0.23·30 - 5.4 = 28.98
        assert_eq!(BodyFatCalculator::bmi_body_fat(Gender::Female, 22.9, 30), 29.0);
        // Clamped at zero
        assert_eq!(BodyFatCalculator::bmi_body_fat(Gender::Male, 5.0, 1), 0.0);
    }

    #[test]
    fn test_classification_thresholds() {
        assert_eq!(BodyFatCalculator::classify(5.9, Gender::Male), BodyFatCategory::EssentialFat);
        assert_eq!(BodyFatCalculator::classify(6.0, Gender::Male), BodyFatCategory::Athletes);
        assert_eq!(BodyFatCalculator::classify(14.0, Gender::Male), BodyFatCategory::Fitness);
        assert_eq!(BodyFatCalculator::classify(18.0, Gender::Male), BodyFatCategory::Average);
        assert_eq!(BodyFatCalculator::classify(25.0, Gender::Male), BodyFatCategory::AboveAverage);
        assert_eq!(BodyFatCalculator::classify(32.0, Gender::Male), BodyFatCategory::Obese);

        assert_eq!(BodyFatCalculator::classify(13.9, Gender::Female), BodyFatCategory::EssentialFat);
        assert_eq!(BodyFatCalculator::classify(21.0, Gender::Female), BodyFatCategory::Fitness);
        assert_eq!(BodyFatCalculator::classify(37.9, Gender::Female), BodyFatCategory::AboveAverage);
        assert_eq!(BodyFatCalculator::classify(38.0, Gender::Female), BodyFatCategory::Obese);
    }

    #[test]
    fn test_ideal_range_brackets() {
        assert_eq!(BodyFatCalculator::ideal_range(Gender::Male, 19), BodyFatRange { min: 8.0, max: 17.0 });
        assert_eq!(BodyFatCalculator::ideal_range(Gender::Male, 20), BodyFatRange { min: 8.0, max: 19.0 });
        assert_eq!(BodyFatCalculator::ideal_range(Gender::Female, 45), BodyFatRange { min: 23.0, max: 32.0 });
        assert_eq!(BodyFatCalculator::ideal_range(Gender::Female, 75), BodyFatRange { min: 26.0, max: 36.0 });
    }

    #[test]
    fn test_narratives_complete() {
        for category in BodyFatCategory::ALL {
            assert!(!category.label().is_empty());
            assert!(!category.description().is_empty());
        }
    }

    #[test]
    fn test_analyze_bmi_with_masses() {
        let result = BodyFatCalculator::analyze_bmi(Gender::Male, 30, 70.0, 175.0, UnitSystem::Metric);
        assert_eq!(result.method, BodyFatMethod::Bmi);
        assert_eq!(result.percentage, 18.2);
        assert_eq!(result.category, BodyFatCategory::Average);
        assert_eq!(result.fat_mass_kg, Some(12.7)); // 70 * 0.182 = 12.74
        assert_eq!(result.lean_mass_kg, Some(57.3));
    }

    #[test]
    fn test_analyze_navy_from_imperial_measurements() {
        let measurements = CircumferenceMeasurements::new(34.0, 15.0, None, 70.0, UnitSystem::Imperial).unwrap();
        assert!((measurements.waist_cm - 86.36).abs() < 1e-9);

        let result = BodyFatCalculator::analyze_navy(Gender::Male, 35, &measurements, None);
        assert!(result.percentage > 0.0);
        assert!(result.diagnostics.is_empty());
        assert!(result.fat_mass_kg.is_none());
    }

    #[test]
    fn test_measurement_validation() {
        assert!(CircumferenceMeasurements::new(0.0, 35.0, None, 175.0, UnitSystem::Metric).is_err());
        assert!(CircumferenceMeasurements::new(80.0, 35.0, Some(-1.0), 175.0, UnitSystem::Metric).is_err());

        let measurements = CircumferenceMeasurements::new(80.0, 35.0, None, 165.0, UnitSystem::Metric).unwrap();
        assert!(measurements.require_complete_for(Gender::Male).is_ok());
        assert!(measurements.require_complete_for(Gender::Female).is_err());
    }
}
