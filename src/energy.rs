//! Energy balance: BMR, TDEE, calorie targets, macronutrients and activity burn
//!
//! # BMR formulas
//!
//! - **Mifflin-St Jeor** (1990): `10·w + 6.25·h - 5·age + 5` (men) / `- 161` (women)
//! - **Harris-Benedict** (Roza & Shizgal revision, 1984):
//!   - Men: `88.362 + 13.397·w + 4.799·h - 5.677·age`
//!   - Women: `447.593 + 9.247·w + 3.098·h - 4.330·age`
//! - **Katch-McArdle**: `370 + 21.6·LBM`, LBM = `w·(1 - bodyFat/100)`
//!
//! Weight in kilograms, height in centimeters. Katch-McArdle without a
//! body-fat percentage falls back to Mifflin-St Jeor.

use crate::error::{Result, VitalsError};
use crate::models::{AnthropometricInput, Gender};
use crate::units::{round_dp, round_whole};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calories per gram of each macronutrient
const PROTEIN_KCAL_PER_G: f64 = 4.0;
const CARBS_KCAL_PER_G: f64 = 4.0;
const FAT_KCAL_PER_G: f64 = 9.0;

/// MET used for activities missing from the table
const DEFAULT_MET: f64 = 4.0;

/// Energy content of one kilogram of body fat
const KCAL_PER_KG_FAT: f64 = 7700.0;

/// BMR equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BmrFormula {
    MifflinStJeor,
    HarrisBenedict,
    KatchMcArdle,
}

impl Default for BmrFormula {
    fn default() -> Self {
        BmrFormula::MifflinStJeor
    }
}

impl fmt::Display for BmrFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BmrFormula::MifflinStJeor => write!(f, "Mifflin-St Jeor"),
            BmrFormula::HarrisBenedict => write!(f, "Harris-Benedict"),
            BmrFormula::KatchMcArdle => write!(f, "Katch-McArdle"),
        }
    }
}

impl FromStr for BmrFormula {
    type Err = VitalsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mifflin" | "mifflin-st-jeor" | "mifflin_st_jeor" => Ok(BmrFormula::MifflinStJeor),
            "harris" | "harris-benedict" | "harris_benedict" => Ok(BmrFormula::HarrisBenedict),
            "katch" | "katch-mcardle" | "katch_mcardle" => Ok(BmrFormula::KatchMcArdle),
            _ => Err(VitalsError::parse("BMR formula", s)),
        }
    }
}

/// Daily activity level used to scale BMR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Physical job or twice-daily training
    VeryActive,
}

impl Default for ActivityLevel {
    fn default() -> Self {
        ActivityLevel::Moderate
    }
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    /// Parse a tag, falling back to `Moderate` for anything unrecognized
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityLevel::Sedentary => write!(f, "sedentary"),
            ActivityLevel::Light => write!(f, "light"),
            ActivityLevel::Moderate => write!(f, "moderate"),
            ActivityLevel::Active => write!(f, "active"),
            ActivityLevel::VeryActive => write!(f, "very active"),
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = VitalsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" | "lightly_active" => Ok(ActivityLevel::Light),
            "moderate" | "moderately_active" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "very_active" | "extra_active" => Ok(ActivityLevel::VeryActive),
            _ => Err(VitalsError::parse("activity level", s)),
        }
    }
}

/// Weight goal driving the calorie offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Default for Goal {
    fn default() -> Self {
        Goal::Maintain
    }
}

impl Goal {
    /// Daily calorie offset applied to TDEE
    pub fn calorie_offset(&self) -> i32 {
        match self {
            Goal::Lose => -500,
            Goal::Maintain => 0,
            Goal::Gain => 500,
        }
    }

    /// Parse a tag, falling back to `Maintain` (no offset) for anything unrecognized
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::Lose => write!(f, "lose"),
            Goal::Maintain => write!(f, "maintain"),
            Goal::Gain => write!(f, "gain"),
        }
    }
}

impl FromStr for Goal {
    type Err = VitalsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lose" | "loss" | "cut" => Ok(Goal::Lose),
            "maintain" | "maintenance" => Ok(Goal::Maintain),
            "gain" | "bulk" => Ok(Goal::Gain),
            _ => Err(VitalsError::parse("goal", s)),
        }
    }
}

/// BMR plus which formula actually produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BmrEstimate {
    pub calories: i32,
    pub requested: BmrFormula,
    pub applied: BmrFormula,
}

impl BmrEstimate {
    pub fn used_fallback(&self) -> bool {
        self.requested != self.applied
    }
}

/// One macronutrient of a split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroAmount {
    pub grams: i32,
    pub calories: i32,
    pub percentage: f64,
}

/// Daily macronutrient split
///
/// Grams are rounded independently, so calories recomputed from grams may
/// differ from the total by a few kcal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroBreakdown {
    pub protein: MacroAmount,
    pub carbs: MacroAmount,
    pub fat: MacroAmount,
}

/// Suggested macro percentages for a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroSuggestion {
    pub protein_pct: f64,
    pub carbs_pct: f64,
    pub fat_pct: f64,
    pub rationale: String,
}

/// BMR relative to the reference range for age and gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmrStatus {
    Low,
    BelowAverage,
    Average,
    AboveAverage,
    High,
}

impl BmrStatus {
    pub fn description(&self) -> &'static str {
        match self {
            BmrStatus::Low => "Well below typical for your age and gender",
            BmrStatus::BelowAverage => "Slightly below typical for your age and gender",
            BmrStatus::Average => "Typical for your age and gender",
            BmrStatus::AboveAverage => "Slightly above typical for your age and gender",
            BmrStatus::High => "Well above typical for your age and gender",
        }
    }
}

impl fmt::Display for BmrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BmrStatus::Low => "Low",
            BmrStatus::BelowAverage => "Below Average",
            BmrStatus::Average => "Average",
            BmrStatus::AboveAverage => "Above Average",
            BmrStatus::High => "High",
        };
        write!(f, "{}", label)
    }
}

/// Reference BMR ranges (kcal) for ages < 30, < 50, >= 50
const MALE_BMR_REFERENCE: [(f64, f64); 3] = [(1650.0, 1900.0), (1550.0, 1800.0), (1450.0, 1700.0)];
const FEMALE_BMR_REFERENCE: [(f64, f64); 3] = [(1350.0, 1550.0), (1300.0, 1500.0), (1200.0, 1400.0)];

/// Band width around the reference bounds separating the outer statuses
const BMR_BAND: f64 = 0.10;

/// MET values, keyed by normalized activity name
static MET_TABLE: [(&str, f64); 8] = [
    ("walking", 3.5),
    ("running", 9.8),
    ("cycling", 7.5),
    ("swimming", 8.0),
    ("yoga", 2.5),
    ("weight training", 6.0),
    ("dancing", 5.0),
    ("hiking", 6.0),
];

/// Complete daily energy plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyResult {
    pub bmr: BmrEstimate,
    pub bmr_status: BmrStatus,
    pub activity_level: ActivityLevel,
    pub tdee: i32,
    pub goal: Goal,
    pub target_calories: i32,
    pub suggestion: MacroSuggestion,
    pub macros: MacroBreakdown,
    /// Expected weight change per week at the target intake (negative = loss)
    pub weekly_change_kg: f64,
}

/// Energy calculation utilities
pub struct EnergyCalculator;

impl EnergyCalculator {
    /// BMR in kcal/day, rounded to the nearest integer
    pub fn bmr(
        gender: Gender,
        age: u32,
        weight_kg: f64,
        height_cm: f64,
        formula: BmrFormula,
        body_fat: Option<f64>,
    ) -> i32 {
        Self::bmr_estimate(gender, age, weight_kg, height_cm, formula, body_fat).calories
    }

    /// BMR together with the formula that was actually applied
    pub fn bmr_estimate(
        gender: Gender,
        age: u32,
        weight_kg: f64,
        height_cm: f64,
        formula: BmrFormula,
        body_fat: Option<f64>,
    ) -> BmrEstimate {
        let age = age as f64;

        let (value, applied) = match (formula, body_fat) {
            (BmrFormula::KatchMcArdle, Some(body_fat)) => {
                let lean_mass = weight_kg * (1.0 - body_fat / 100.0);
                (370.0 + 21.6 * lean_mass, BmrFormula::KatchMcArdle)
            }
            (BmrFormula::HarrisBenedict, _) => {
                let value = match gender {
                    Gender::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age,
                    Gender::Female => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age,
                };
                (value, BmrFormula::HarrisBenedict)
            }
            _ => {
                let offset = match gender {
                    Gender::Male => 5.0,
                    Gender::Female => -161.0,
                };
                (
                    10.0 * weight_kg + 6.25 * height_cm - 5.0 * age + offset,
                    BmrFormula::MifflinStJeor,
                )
            }
        };

        BmrEstimate {
            calories: round_whole(value) as i32,
            requested: formula,
            applied,
        }
    }

    /// Total daily energy expenditure
    pub fn tdee(bmr: i32, activity_level: ActivityLevel) -> i32 {
        round_whole(bmr as f64 * activity_level.multiplier()) as i32
    }

    pub fn target_calories(tdee: i32, goal: Goal) -> i32 {
        tdee + goal.calorie_offset()
    }

    /// Split a calorie total by percentages into grams and calories per macro
    pub fn macro_split(total_calories: i32, protein_pct: f64, carbs_pct: f64, fat_pct: f64) -> MacroBreakdown {
        let amount = |pct: f64, kcal_per_gram: f64| {
            let calories = total_calories as f64 * pct / 100.0;
            MacroAmount {
                grams: round_whole(calories / kcal_per_gram) as i32,
                calories: round_whole(calories) as i32,
                percentage: pct,
            }
        };

        MacroBreakdown {
            protein: amount(protein_pct, PROTEIN_KCAL_PER_G),
            carbs: amount(carbs_pct, CARBS_KCAL_PER_G),
            fat: amount(fat_pct, FAT_KCAL_PER_G),
        }
    }

    /// Recommended macro percentages for a goal
    pub fn macro_suggestion(goal: Goal) -> MacroSuggestion {
        let (protein_pct, carbs_pct, fat_pct, rationale) = match goal {
            Goal::Lose => (
                40.0,
                30.0,
                30.0,
                "Higher protein preserves lean mass and improves satiety during a calorie deficit.",
            ),
            Goal::Maintain => (
                30.0,
                40.0,
                30.0,
                "A balanced split supports steady energy and long-term adherence.",
            ),
            Goal::Gain => (
                30.0,
                45.0,
                25.0,
                "Extra carbohydrates fuel training volume while protein supports muscle growth.",
            ),
        };

        MacroSuggestion {
            protein_pct,
            carbs_pct,
            fat_pct,
            rationale: rationale.to_string(),
        }
    }

    /// MET value for a named activity, 4.0 when unknown
    pub fn met_value(activity: &str) -> f64 {
        let normalized = activity.trim().to_lowercase().replace(['_', '-'], " ");
        MET_TABLE
            .iter()
            .find(|(name, _)| *name == normalized)
            .map(|(_, met)| *met)
            .unwrap_or(DEFAULT_MET)
    }

    pub fn known_activities() -> impl Iterator<Item = &'static str> {
        MET_TABLE.iter().map(|(name, _)| *name)
    }

    /// Calories burned: MET × weight (kg) × duration (hours), rounded
    pub fn activity_calories(weight_kg: f64, duration_minutes: f64, activity: &str) -> i32 {
        round_whole(Self::met_value(activity) * weight_kg * duration_minutes / 60.0) as i32
    }

    /// Compare a BMR against the population reference for age and gender
    pub fn bmr_descriptor(bmr: i32, gender: Gender, age: u32) -> BmrStatus {
        let bracket = match age {
            0..=29 => 0,
            30..=49 => 1,
            _ => 2,
        };
        let (low, high) = match gender {
            Gender::Male => MALE_BMR_REFERENCE[bracket],
            Gender::Female => FEMALE_BMR_REFERENCE[bracket],
        };

        let bmr = bmr as f64;
        if bmr < low * (1.0 - BMR_BAND) {
            BmrStatus::Low
        } else if bmr < low {
            BmrStatus::BelowAverage
        } else if bmr <= high {
            BmrStatus::Average
        } else if bmr <= high * (1.0 + BMR_BAND) {
            BmrStatus::AboveAverage
        } else {
            BmrStatus::High
        }
    }

    /// Weekly weight change implied by eating `target` against `tdee`
    pub fn weekly_weight_change_kg(target: i32, tdee: i32) -> f64 {
        round_dp((target - tdee) as f64 * 7.0 / KCAL_PER_KG_FAT, 2)
    }

    /// BMR → TDEE → goal target → suggested macro split
    pub fn plan(
        input: &AnthropometricInput,
        formula: BmrFormula,
        body_fat: Option<f64>,
        activity_level: ActivityLevel,
        goal: Goal,
    ) -> EnergyResult {
        let bmr = Self::bmr_estimate(
            input.gender(),
            input.age(),
            input.weight_kg(),
            input.height_cm(),
            formula,
            body_fat,
        );
        let tdee = Self::tdee(bmr.calories, activity_level);
        let target_calories = Self::target_calories(tdee, goal);
        let suggestion = Self::macro_suggestion(goal);
        let macros = Self::macro_split(
            target_calories,
            suggestion.protein_pct,
            suggestion.carbs_pct,
            suggestion.fat_pct,
        );

        tracing::debug!(
            bmr = bmr.calories,
            formula = %bmr.applied,
            tdee,
            target_calories,
            "Energy plan calculated"
        );

        EnergyResult {
            bmr,
            bmr_status: Self::bmr_descriptor(bmr.calories, input.gender(), input.age()),
            activity_level,
            tdee,
            goal,
            target_calories,
            suggestion,
            macros,
            weekly_change_kg: Self::weekly_weight_change_kg(target_calories, tdee),
        }
    }
}
