//! Combined health report for one set of body measurements

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bmi::{BmiCalculator, BmiResult};
use crate::body_composition::{BodyFatCalculator, BodyFatResult};
use crate::energy::{ActivityLevel, BmrFormula, EnergyCalculator, EnergyResult, Goal};
use crate::ideal_weight::{FrameSize, IdealWeightCalculator, IdealWeightResult};
use crate::models::{AnthropometricInput, Diagnostic};

/// BMI, body fat, ideal weight and energy plan for one person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub generated_at: DateTime<Utc>,
    pub input: AnthropometricInput,
    pub bmi: BmiResult,
    pub body_fat: BodyFatResult,
    pub ideal_weight: IdealWeightResult,
    pub energy: EnergyResult,
}

impl HealthReport {
    /// Run every anthropometric engine over `input`
    ///
    /// Body fat uses the BMI method since no circumferences are available;
    /// BMR uses Mifflin-St Jeor.
    pub fn build(input: &AnthropometricInput, activity_level: ActivityLevel, goal: Goal) -> Self {
        let bmi = BmiCalculator::analyze(input.weight(), input.height(), input.system());
        let body_fat = BodyFatCalculator::analyze_bmi(
            input.gender(),
            input.age(),
            input.weight(),
            input.height(),
            input.system(),
        );
        let ideal_weight = IdealWeightCalculator::calculate(
            input.height(),
            input.gender(),
            input.age(),
            FrameSize::Medium,
            input.system(),
        );
        let energy = EnergyCalculator::plan(input, BmrFormula::MifflinStJeor, None, activity_level, goal);

        tracing::debug!(
            bmi = bmi.bmi,
            body_fat = body_fat.percentage,
            target_calories = energy.target_calories,
            "Health report built"
        );

        Self {
            generated_at: Utc::now(),
            input: input.clone(),
            bmi,
            body_fat,
            ideal_weight,
            energy,
        }
    }

    /// Diagnostics from every section, in section order
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.bmi
            .diagnostics
            .iter()
            .chain(&self.body_fat.diagnostics)
            .chain(&self.ideal_weight.diagnostics)
    }

    /// Whether the current weight sits inside the consensus ideal range
    pub fn within_ideal_range(&self) -> bool {
        self.ideal_weight.range.contains(self.input.weight_kg())
    }
}
