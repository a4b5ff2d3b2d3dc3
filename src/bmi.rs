//! Body-mass index calculation and classification
//!
//! BMI categories follow the WHO adult cut points:
//! - Underweight: < 18.5
//! - Normal weight: 18.5 - 24.9
//! - Overweight: 25 - 29.9
//! - Obesity Class 1: 30 - 34.9
//! - Obesity Class 2: 35 - 39.9
//! - Obesity Class 3: >= 40
//!
//! Every lower bound is inclusive: a BMI of exactly 18.5 is Normal weight.

use crate::models::{Diagnostic, DiagnosticKind, UnitSystem, WeightRange};
use crate::units::round_dp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Imperial BMI conversion factor (lb/in² → kg/m²)
const IMPERIAL_FACTOR: f64 = 703.0;

/// BMI bounds of the healthy weight band
const HEALTHY_BMI_MIN: f64 = 18.5;
const HEALTHY_BMI_MAX: f64 = 24.9;

/// Ordinal BMI category, ordered from lowest to highest BMI
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    NormalWeight,
    Overweight,
    ObesityClass1,
    ObesityClass2,
    ObesityClass3,
}

impl BmiCategory {
    pub const ALL: [BmiCategory; 6] = [
        BmiCategory::Underweight,
        BmiCategory::NormalWeight,
        BmiCategory::Overweight,
        BmiCategory::ObesityClass1,
        BmiCategory::ObesityClass2,
        BmiCategory::ObesityClass3,
    ];

    pub fn label(&self) -> &'static str {
        self.narrative().label
    }

    pub fn color(&self) -> &'static str {
        self.narrative().color
    }

    pub fn risk(&self) -> &'static str {
        self.narrative().risk
    }

    pub fn recommendations(&self) -> &'static [&'static str] {
        self.narrative().recommendations
    }

    fn narrative(&self) -> &'static CategoryNarrative {
        &BMI_NARRATIVES[*self as usize]
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Fixed display text for one category
struct CategoryNarrative {
    label: &'static str,
    color: &'static str,
    risk: &'static str,
    recommendations: &'static [&'static str],
}

/// Indexed by `BmiCategory` ordinal
static BMI_NARRATIVES: [CategoryNarrative; 6] = [
    CategoryNarrative {
        label: "Underweight",
        color: "blue",
        risk: "Increased risk of nutritional deficiency, weakened immunity and osteoporosis.",
        recommendations: &[
            "Eat nutrient-dense meals with adequate protein and healthy fats",
            "Add strength training to build lean muscle",
            "Consult a healthcare provider to rule out underlying causes",
        ],
    },
    CategoryNarrative {
        label: "Normal weight",
        color: "green",
        risk: "Lowest risk of weight-related health problems.",
        recommendations: &[
            "Maintain a balanced diet rich in whole foods",
            "Aim for at least 150 minutes of moderate activity per week",
            "Keep monitoring your weight periodically",
        ],
    },
    CategoryNarrative {
        label: "Overweight",
        color: "yellow",
        risk: "Moderately increased risk of heart disease, type 2 diabetes and hypertension.",
        recommendations: &[
            "Create a modest calorie deficit of 300-500 kcal per day",
            "Increase daily movement and add regular cardio",
            "Limit sugary drinks and highly processed foods",
        ],
    },
    CategoryNarrative {
        label: "Obesity Class 1",
        color: "orange",
        risk: "High risk of cardiovascular disease, type 2 diabetes and sleep apnea.",
        recommendations: &[
            "Set a gradual weight-loss target of 0.5-1 kg per week",
            "Combine aerobic exercise with resistance training",
            "Discuss a structured weight-management plan with a professional",
        ],
    },
    CategoryNarrative {
        label: "Obesity Class 2",
        color: "red",
        risk: "Very high risk of cardiovascular and metabolic disease.",
        recommendations: &[
            "Seek medical guidance before starting a new exercise program",
            "Work with a dietitian on a sustainable eating plan",
            "Screen regularly for blood pressure, blood sugar and cholesterol",
        ],
    },
    CategoryNarrative {
        label: "Obesity Class 3",
        color: "darkred",
        risk: "Extremely high risk of serious health complications.",
        recommendations: &[
            "Consult a physician about comprehensive treatment options",
            "Start with low-impact activity such as walking or swimming",
            "Consider a supervised medical weight-loss program",
        ],
    },
];

/// Complete BMI evaluation ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// BMI rounded to one decimal (0 when inputs are not positive)
    pub bmi: f64,
    pub category: BmiCategory,
    pub color: String,
    pub risk: String,
    pub recommendations: Vec<String>,
    /// Healthy weight band in the unit system of the request
    pub ideal_weight: WeightRange,
    pub system: UnitSystem,
    pub diagnostics: Vec<Diagnostic>,
}

/// BMI calculation utilities
pub struct BmiCalculator;

impl BmiCalculator {
    /// Calculate BMI rounded to one decimal
    ///
    /// Metric takes kilograms and centimeters, imperial pounds and inches.
    /// Returns 0 when either input is not positive.
    pub fn compute_bmi(weight: f64, height: f64, system: UnitSystem) -> f64 {
        if !(weight > 0.0) || !(height > 0.0) {
            return 0.0;
        }

        let bmi = match system {
            UnitSystem::Metric => {
                let meters = height / 100.0;
                weight / (meters * meters)
            }
            UnitSystem::Imperial => IMPERIAL_FACTOR * weight / (height * height),
        };

        round_dp(bmi, 1)
    }

    /// Map a BMI value to its category
    pub fn classify(bmi: f64) -> BmiCategory {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::NormalWeight
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else if bmi < 35.0 {
            BmiCategory::ObesityClass1
        } else if bmi < 40.0 {
            BmiCategory::ObesityClass2
        } else {
            BmiCategory::ObesityClass3
        }
    }

    /// Weight band corresponding to BMI 18.5 - 24.9 at the given height
    ///
    /// Returned in the unit system of `height`; `{0, 0}` when height is not positive.
    pub fn ideal_weight_range(height: f64, system: UnitSystem) -> WeightRange {
        if !(height > 0.0) {
            return WeightRange::default();
        }

        let weight_at = |bmi: f64| match system {
            UnitSystem::Metric => {
                let meters = height / 100.0;
                bmi * meters * meters
            }
            UnitSystem::Imperial => bmi * height * height / IMPERIAL_FACTOR,
        };

        WeightRange {
            min: round_dp(weight_at(HEALTHY_BMI_MIN), 1),
            max: round_dp(weight_at(HEALTHY_BMI_MAX), 1),
        }
    }

    /// Full BMI evaluation with narrative text
    pub fn analyze(weight: f64, height: f64, system: UnitSystem) -> BmiResult {
        let bmi = Self::compute_bmi(weight, height, system);
        let category = Self::classify(bmi);

        let mut diagnostics = Vec::new();
        if bmi == 0.0 {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::InfeasibleInput,
                format!("weight ({}) and height ({}) must both be positive", weight, height),
            ));
        }

        tracing::debug!(bmi, category = %category, "BMI calculated");

        BmiResult {
            bmi,
            category,
            color: category.color().to_string(),
            risk: category.risk().to_string(),
            recommendations: category
                .recommendations()
                .iter()
                .map(|r| r.to_string())
                .collect(),
            ideal_weight: Self::ideal_weight_range(height, system),
            system,
            diagnostics,
        }
    }
}
