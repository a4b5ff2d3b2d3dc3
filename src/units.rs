//! Metric/imperial conversions shared by every calculator
//!
//! Whole-unit rounding on the centimeter ↔ feet/inches path means a round trip
//! may drift by up to 1 cm. Source values are user-entered whole numbers, so
//! the loss is accepted.

use crate::error::VitalsError;
use crate::models::UnitSystem;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pounds per kilogram
pub const LB_PER_KG: f64 = 2.20462;

/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;

/// Height split into whole feet and inches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeetInches {
    pub feet: u32,
    pub inches: u32,
}

impl FeetInches {
    pub fn total_inches(&self) -> u32 {
        self.feet * 12 + self.inches
    }

    /// Height in `system` units: whole centimeters or total inches
    pub fn to_length(&self, system: UnitSystem) -> f64 {
        match system {
            UnitSystem::Metric => UnitConverter::feet_inches_to_cm(self.feet, self.inches),
            UnitSystem::Imperial => self.total_inches() as f64,
        }
    }
}

impl fmt::Display for FeetInches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'{}\"", self.feet, self.inches)
    }
}

/// Accepts `5'9"`, `5'9`, `5ft 9in` and `6'`
impl FromStr for FeetInches {
    type Err = VitalsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_lowercase()
            .replace("ft", "'")
            .replace("in", "")
            .replace('"', "");
        let invalid = || VitalsError::parse("height in feet and inches", s);

        let (feet, inches) = normalized.split_once('\'').ok_or_else(invalid)?;
        let feet: u32 = feet.trim().parse().map_err(|_| invalid())?;
        let inches: u32 = match inches.trim() {
            "" => 0,
            text => text.parse().map_err(|_| invalid())?,
        };

        if inches >= 12 || feet == 0 {
            return Err(invalid());
        }
        Ok(FeetInches { feet, inches })
    }
}

/// Unit conversion utilities
pub struct UnitConverter;

impl UnitConverter {
    pub fn kg_to_lb(kg: f64) -> f64 {
        kg * LB_PER_KG
    }

    pub fn lb_to_kg(lb: f64) -> f64 {
        lb / LB_PER_KG
    }

    /// Kilograms to pounds, rounded to one decimal for display
    pub fn metric_to_imperial_weight(kg: f64) -> f64 {
        round_dp(Self::kg_to_lb(kg), 1)
    }

    /// Pounds to kilograms, rounded to one decimal for display
    pub fn imperial_to_metric_weight(lb: f64) -> f64 {
        round_dp(Self::lb_to_kg(lb), 1)
    }

    pub fn cm_to_inches(cm: f64) -> f64 {
        cm / CM_PER_INCH
    }

    pub fn inches_to_cm(inches: f64) -> f64 {
        inches * CM_PER_INCH
    }

    /// Centimeters to whole feet and inches (total inches rounded first)
    pub fn cm_to_feet_inches(cm: f64) -> FeetInches {
        if !(cm > 0.0) {
            return FeetInches { feet: 0, inches: 0 };
        }
        let total_inches = round_whole(Self::cm_to_inches(cm)) as u32;
        FeetInches {
            feet: total_inches / 12,
            inches: total_inches % 12,
        }
    }

    /// Feet and inches to centimeters, rounded to the nearest centimeter
    pub fn feet_inches_to_cm(feet: u32, inches: u32) -> f64 {
        round_whole(Self::inches_to_cm((feet * 12 + inches) as f64))
    }

    pub fn normalize_weight_to_kg(weight: f64, system: UnitSystem) -> f64 {
        match system {
            UnitSystem::Metric => weight,
            UnitSystem::Imperial => Self::lb_to_kg(weight),
        }
    }

    /// Lengths (height, circumferences) entered in cm or inches
    pub fn normalize_length_to_cm(length: f64, system: UnitSystem) -> f64 {
        match system {
            UnitSystem::Metric => length,
            UnitSystem::Imperial => Self::inches_to_cm(length),
        }
    }

    pub fn normalize_length_to_inches(length: f64, system: UnitSystem) -> f64 {
        match system {
            UnitSystem::Metric => Self::cm_to_inches(length),
            UnitSystem::Imperial => length,
        }
    }

    /// Express a kilogram value in the requested unit system
    pub fn weight_from_kg(kg: f64, system: UnitSystem) -> f64 {
        match system {
            UnitSystem::Metric => kg,
            UnitSystem::Imperial => Self::kg_to_lb(kg),
        }
    }
}

/// Round half away from zero to `dp` decimal places
///
/// Goes through `Decimal` so that values such as 22.85 round up the way a
/// person reading the number expects. Non-finite input is returned as is.
pub fn round_dp(value: f64, dp: u32) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Round half away from zero to a whole number
pub fn round_whole(value: f64) -> f64 {
    round_dp(value, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feet_inches_parsing() {
        assert_eq!("5'9\"".parse::<FeetInches>().unwrap(), FeetInches { feet: 5, inches: 9 });
        assert_eq!("5ft 9in".parse::<FeetInches>().unwrap(), FeetInches { feet: 5, inches: 9 });
        assert_eq!("6'".parse::<FeetInches>().unwrap(), FeetInches { feet: 6, inches: 0 });
        assert!("5'12".parse::<FeetInches>().is_err());
        assert!("175".parse::<FeetInches>().is_err());
        assert!("five'nine".parse::<FeetInches>().is_err());

        let height = FeetInches { feet: 5, inches: 9 };
        assert_eq!(height.to_string(), "5'9\"");
        assert_eq!(height.to_length(UnitSystem::Metric), 175.0);
        assert_eq!(height.to_length(UnitSystem::Imperial), 69.0);
    }

    #[test]
    fn test_weight_conversions() {
        assert_eq!(UnitConverter::metric_to_imperial_weight(70.0), 154.3);
        assert_eq!(UnitConverter::imperial_to_metric_weight(154.0), 69.9);

        // Round trip drifts by less than one pound
        let back = UnitConverter::metric_to_imperial_weight(UnitConverter::imperial_to_metric_weight(154.0));
        assert!((back - 154.0).abs() <= 1.0);
    }

    #[test]
    fn test_height_conversions() {
        let fi = UnitConverter::cm_to_feet_inches(175.0);
        assert_eq!(fi, FeetInches { feet: 5, inches: 9 });
        assert_eq!(UnitConverter::feet_inches_to_cm(5, 9), 175.0);

        let fi = UnitConverter::cm_to_feet_inches(183.0);
        assert_eq!(fi, FeetInches { feet: 6, inches: 0 });
        assert_eq!(UnitConverter::feet_inches_to_cm(6, 0), 183.0);
    }

    #[test]
    fn test_feet_inches_round_trip_drift() {
        for cm in 120..=220 {
            let fi = UnitConverter::cm_to_feet_inches(cm as f64);
            let back = UnitConverter::feet_inches_to_cm(fi.feet, fi.inches);
            assert!((back - cm as f64).abs() <= 1.0, "{} cm drifted to {}", cm, back);
        }
    }

    #[test]
    fn test_non_positive_height() {
        assert_eq!(UnitConverter::cm_to_feet_inches(0.0), FeetInches { feet: 0, inches: 0 });
        assert_eq!(UnitConverter::cm_to_feet_inches(-5.0), FeetInches { feet: 0, inches: 0 });
    }

    #[test]
    fn test_normalization() {
        assert_eq!(UnitConverter::normalize_weight_to_kg(70.0, UnitSystem::Metric), 70.0);
        assert!((UnitConverter::normalize_weight_to_kg(220.462, UnitSystem::Imperial) - 100.0).abs() < 1e-9);
        assert!((UnitConverter::normalize_length_to_cm(10.0, UnitSystem::Imperial) - 25.4).abs() < 1e-9);
        assert!((UnitConverter::normalize_length_to_inches(25.4, UnitSystem::Metric) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(round_dp(22.857142, 1), 22.9);
        assert_eq!(round_dp(22.85, 1), 22.9);
        assert_eq!(round_dp(1648.75, 0), 1649.0);
        assert_eq!(round_whole(2.5), 3.0);
        assert!(round_dp(f64::NAN, 1).is_nan());
    }
}
