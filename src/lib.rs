// Library interface for VitalRS modules
// The binary and integration tests both go through these exports

pub mod blood_pressure;
pub mod bmi;
pub mod body_composition;
pub mod config;
pub mod energy;
pub mod error;
pub mod heart_rate;
pub mod ideal_weight;
pub mod logging;
pub mod models;
pub mod report;
pub mod sleep;
pub mod units;

// Re-export commonly used types for convenience
pub use models::*;
pub use blood_pressure::{BloodPressureAnalyzer, BloodPressureCategory, BloodPressureReading};
pub use bmi::{BmiCalculator, BmiCategory, BmiResult};
pub use body_composition::{BodyFatCalculator, BodyFatCategory, BodyFatResult, CircumferenceMeasurements};
pub use energy::{ActivityLevel, BmrFormula, EnergyCalculator, EnergyResult, Goal};
pub use heart_rate::{FitnessLevel, HeartRateProfile, HeartRateResult, HeartRateZoneCalculator};
pub use ideal_weight::{FrameSize, IdealWeightCalculator, IdealWeightResult};
pub use report::HealthReport;
pub use sleep::{SleepCycleCalculator, SleepQualityInput, SleepQualityScorer, SleepStage, SleepTimeline};
pub use units::UnitConverter;
pub use error::{Result, ValidationError, VitalsError};
pub use logging::{LogConfig, LogFormat, LogLevel};
