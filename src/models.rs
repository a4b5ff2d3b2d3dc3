use crate::error::{Result, ValidationError, VitalsError};
use crate::units::UnitConverter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Biological sex tag consumed by every gender-conditioned formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Default for Gender {
    fn default() -> Self {
        Gender::Male
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Gender {
    type Err = VitalsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(VitalsError::parse("gender", s)),
        }
    }
}

/// Measurement system of user-entered values
///
/// Metric: kilograms and centimeters. Imperial: pounds and inches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl Default for UnitSystem {
    fn default() -> Self {
        UnitSystem::Metric
    }
}

impl UnitSystem {
    pub fn weight_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "kg",
            UnitSystem::Imperial => "lb",
        }
    }

    pub fn length_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "cm",
            UnitSystem::Imperial => "in",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "metric"),
            UnitSystem::Imperial => write!(f, "imperial"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = VitalsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "si" => Ok(UnitSystem::Metric),
            "imperial" | "us" => Ok(UnitSystem::Imperial),
            _ => Err(VitalsError::parse("unit system", s)),
        }
    }
}

/// Kind of side-channel note attached to a calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Inputs make the formula undefined; the sentinel value 0 was returned
    InfeasibleInput,
    /// A measurement the method needs was not supplied
    MissingMeasurement,
    /// An out-of-range input was replaced by its documented default
    DefaultSubstituted,
    /// A different formula than requested produced the value
    FormulaFallback,
    /// Inputs fall outside the population the formula was derived from
    OutsideReferencePopulation,
}

/// Structured note explaining how a result was produced
///
/// Engines return these with their results instead of writing to a global
/// logger; callers decide whether to log, display or ignore them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Weight band in the unit system of the request
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightRange {
    pub min: f64,
    pub max: f64,
}

impl WeightRange {
    pub fn contains(&self, weight: f64) -> bool {
        weight >= self.min && weight <= self.max
    }
}

/// Validated anthropometric input
///
/// All measurements are strictly positive. Weight and height are stored in
/// the unit system they were entered in and normalized on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAnthropometricInput")]
pub struct AnthropometricInput {
    weight: f64,
    height: f64,
    age: u32,
    gender: Gender,
    system: UnitSystem,
}

/// Unchecked wire form; deserialization goes through `AnthropometricInput::new`
#[derive(Deserialize)]
struct RawAnthropometricInput {
    weight: f64,
    height: f64,
    age: u32,
    gender: Gender,
    system: UnitSystem,
}

impl TryFrom<RawAnthropometricInput> for AnthropometricInput {
    type Error = VitalsError;

    fn try_from(raw: RawAnthropometricInput) -> Result<Self> {
        Self::new(raw.weight, raw.height, raw.age, raw.gender, raw.system)
    }
}

impl AnthropometricInput {
    pub fn new(weight: f64, height: f64, age: u32, gender: Gender, system: UnitSystem) -> Result<Self> {
        require_positive("weight", weight)?;
        require_positive("height", height)?;
        if age == 0 || age > 120 {
            return Err(ValidationError::OutOfRange {
                field: "age".to_string(),
                min: 1.0,
                max: 120.0,
                value: age as f64,
            }
            .into());
        }

        Ok(Self {
            weight,
            height,
            age,
            gender,
            system,
        })
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn system(&self) -> UnitSystem {
        self.system
    }

    pub fn weight_kg(&self) -> f64 {
        UnitConverter::normalize_weight_to_kg(self.weight, self.system)
    }

    pub fn height_cm(&self) -> f64 {
        UnitConverter::normalize_length_to_cm(self.height, self.system)
    }
}

/// Reject non-finite and non-positive measurements
pub(crate) fn require_positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::NotPositive {
            field: field.to_string(),
            value,
        }
        .into());
    }
    Ok(())
}
