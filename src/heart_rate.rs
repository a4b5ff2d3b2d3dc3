//! Heart-rate training zones (Karvonen method)
//!
//! - Max HR (Tanaka, 2001): `208 - 0.7·age`, never below resting HR + 1
//! - Heart-rate reserve: `HRR = maxHR - restingHR`, at least 1
//! - Zone edges: `restingHR + HRR·boundary` for boundaries 50/60/70/80/90/100%
//!
//! Zone bounds, recovery HR and target HR are all computed from the single
//! `ZONE_BOUNDARIES` table so adjacent zones share identical edges.

use crate::models::{Diagnostic, DiagnosticKind};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Age substituted when the supplied age is outside 1-120
pub const DEFAULT_AGE: u16 = 30;

/// Resting HR substituted when the supplied value is outside 31-120 bpm
pub const DEFAULT_RESTING_HR: u16 = 70;

/// VO2max reported when resting HR is unusable
const DEFAULT_VO2MAX: u16 = 40;

/// Fractions of HRR above resting HR delimiting the five zones
const ZONE_BOUNDARIES: [Decimal; 6] = [
    dec!(0.5),
    dec!(0.6),
    dec!(0.7),
    dec!(0.8),
    dec!(0.9),
    dec!(1.0),
];

/// Fraction of HRR for the one-minute recovery heart rate
const RECOVERY_FRACTION: Decimal = dec!(0.3);

struct ZoneTemplate {
    name: &'static str,
    description: &'static str,
    color: &'static str,
}

static ZONE_TEMPLATES: [ZoneTemplate; 5] = [
    ZoneTemplate {
        name: "Recovery",
        description: "Very light effort for warm-ups, cool-downs and active recovery",
        color: "gray",
    },
    ZoneTemplate {
        name: "Endurance",
        description: "Comfortable aerobic pace that builds base fitness and fat metabolism",
        color: "blue",
    },
    ZoneTemplate {
        name: "Aerobic",
        description: "Moderate effort improving cardiovascular efficiency",
        color: "green",
    },
    ZoneTemplate {
        name: "Threshold",
        description: "Hard effort raising lactate threshold and speed endurance",
        color: "orange",
    },
    ZoneTemplate {
        name: "Maximum",
        description: "Maximal effort for short intervals developing peak power",
        color: "red",
    },
];

/// Training experience, selecting the target-HR boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl Default for FitnessLevel {
    fn default() -> Self {
        FitnessLevel::Intermediate
    }
}

impl FitnessLevel {
    /// HRR fraction for the target heart rate: 60 / 70 / 80%
    fn target_boundary(&self) -> Decimal {
        match self {
            FitnessLevel::Beginner => ZONE_BOUNDARIES[1],
            FitnessLevel::Intermediate => ZONE_BOUNDARIES[2],
            FitnessLevel::Advanced => ZONE_BOUNDARIES[3],
        }
    }

    /// Parse a tag, falling back to `Intermediate` for anything unrecognized
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitnessLevel::Beginner => write!(f, "beginner"),
            FitnessLevel::Intermediate => write!(f, "intermediate"),
            FitnessLevel::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for FitnessLevel {
    type Err = crate::error::VitalsError;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(FitnessLevel::Beginner),
            "intermediate" => Ok(FitnessLevel::Intermediate),
            "advanced" => Ok(FitnessLevel::Advanced),
            _ => Err(crate::error::VitalsError::parse("fitness level", s)),
        }
    }
}

/// Heart-rate inputs after default substitution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateProfile {
    age: u16,
    resting_hr: u16,
    fitness_level: FitnessLevel,
    diagnostics: Vec<Diagnostic>,
}

impl HeartRateProfile {
    /// Build a profile, replacing out-of-range age or resting HR with defaults
    pub fn new(age: i32, resting_hr: i32, fitness_level: FitnessLevel) -> Self {
        let mut diagnostics = Vec::new();

        let age = if (1..=120).contains(&age) {
            age as u16
        } else {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::DefaultSubstituted,
                format!("age {} is outside 1-120, using {}", age, DEFAULT_AGE),
            ));
            DEFAULT_AGE
        };

        let resting_hr = if (31..=120).contains(&resting_hr) {
            resting_hr as u16
        } else {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::DefaultSubstituted,
                format!(
                    "resting heart rate {} is outside 31-120 bpm, using {}",
                    resting_hr, DEFAULT_RESTING_HR
                ),
            ));
            DEFAULT_RESTING_HR
        };

        Self {
            age,
            resting_hr,
            fitness_level,
            diagnostics,
        }
    }

    /// Like `new`, but a resting HR that was never supplied uses the default
    /// without a diagnostic
    pub fn with_optional_resting(age: i32, resting_hr: Option<i32>, fitness_level: FitnessLevel) -> Self {
        Self::new(
            age,
            resting_hr.unwrap_or(i32::from(DEFAULT_RESTING_HR)),
            fitness_level,
        )
    }

    pub fn age(&self) -> u16 {
        self.age
    }

    pub fn resting_hr(&self) -> u16 {
        self.resting_hr
    }

    pub fn fitness_level(&self) -> FitnessLevel {
        self.fitness_level
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// One training zone; `max` of zone N equals `min` of zone N+1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateZone {
    pub zone: u8,
    pub min: u16,
    pub max: u16,
    pub name: String,
    pub description: String,
    pub color: String,
}

/// Complete heart-rate evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateResult {
    pub age: u16,
    pub max_hr: u16,
    pub resting_hr: u16,
    pub heart_rate_reserve: u16,
    pub zones: Vec<HeartRateZone>,
    pub recovery_hr: u16,
    pub fitness_level: FitnessLevel,
    pub target_hr: u16,
    pub vo2max: u16,
    pub diagnostics: Vec<Diagnostic>,
}

/// Heart-rate zone calculation utilities
pub struct HeartRateZoneCalculator;

impl HeartRateZoneCalculator {
    /// Tanaka max HR, floored at one beat above resting HR
    pub fn max_hr(age: u16, resting_hr: u16) -> u16 {
        let tanaka = dec!(208) - dec!(0.7) * Decimal::from(age);
        Self::to_bpm(tanaka).max(resting_hr.saturating_add(1))
    }

    /// Heart-rate reserve, at least 1
    pub fn heart_rate_reserve(max_hr: u16, resting_hr: u16) -> u16 {
        max_hr.saturating_sub(resting_hr).max(1)
    }

    /// Five contiguous Karvonen zones
    pub fn zones(resting_hr: u16, hrr: u16) -> Vec<HeartRateZone> {
        ZONE_BOUNDARIES
            .windows(2)
            .zip(ZONE_TEMPLATES.iter())
            .enumerate()
            .map(|(i, (bounds, template))| HeartRateZone {
                zone: i as u8 + 1,
                min: Self::karvonen(resting_hr, hrr, bounds[0]),
                max: Self::karvonen(resting_hr, hrr, bounds[1]),
                name: template.name.to_string(),
                description: template.description.to_string(),
                color: template.color.to_string(),
            })
            .collect()
    }

    /// Expected heart rate one minute after stopping exercise
    pub fn recovery_hr(resting_hr: u16, hrr: u16) -> u16 {
        Self::karvonen(resting_hr, hrr, RECOVERY_FRACTION)
    }

    pub fn target_hr(resting_hr: u16, hrr: u16, fitness_level: FitnessLevel) -> u16 {
        Self::karvonen(resting_hr, hrr, fitness_level.target_boundary())
    }

    /// Uth-Sørensen estimate: `15.3 × maxHR / restingHR`, 40 when resting HR is 0
    pub fn vo2max(max_hr: u16, resting_hr: u16) -> u16 {
        if resting_hr == 0 {
            return DEFAULT_VO2MAX;
        }
        Self::to_bpm(dec!(15.3) * Decimal::from(max_hr) / Decimal::from(resting_hr))
    }

    /// Determine which zone a heart rate falls into; `None` below zone 1
    pub fn zone_for(hr: u16, zones: &[HeartRateZone]) -> Option<u8> {
        let first = zones.first()?;
        if hr < first.min {
            return None;
        }
        zones
            .iter()
            .find(|z| hr <= z.max)
            .or(zones.last())
            .map(|z| z.zone)
    }

    /// Full evaluation for a profile
    pub fn calculate(profile: &HeartRateProfile) -> HeartRateResult {
        let resting_hr = profile.resting_hr;
        let max_hr = Self::max_hr(profile.age, resting_hr);
        let hrr = Self::heart_rate_reserve(max_hr, resting_hr);

        tracing::debug!(max_hr, resting_hr, hrr, "Heart rate zones calculated");

        HeartRateResult {
            age: profile.age,
            max_hr,
            resting_hr,
            heart_rate_reserve: hrr,
            zones: Self::zones(resting_hr, hrr),
            recovery_hr: Self::recovery_hr(resting_hr, hrr),
            fitness_level: profile.fitness_level,
            target_hr: Self::target_hr(resting_hr, hrr, profile.fitness_level),
            vo2max: Self::vo2max(max_hr, resting_hr),
            diagnostics: profile.diagnostics.clone(),
        }
    }

    fn karvonen(resting_hr: u16, hrr: u16, fraction: Decimal) -> u16 {
        Self::to_bpm(Decimal::from(resting_hr) + Decimal::from(hrr) * fraction)
    }

    fn to_bpm(value: Decimal) -> u16 {
        value
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .max(Decimal::ZERO)
            .to_u16()
            .unwrap_or(u16::MAX)
    }
}
