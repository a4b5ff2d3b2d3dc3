use chrono::{Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use vitalrs::blood_pressure::{BloodPressureAnalyzer, BloodPressureCategory, BloodPressureReading};
use vitalrs::bmi::{BmiCalculator, BmiCategory};
use vitalrs::body_composition::{BodyFatCalculator, CircumferenceMeasurements};
use vitalrs::config::AppConfig;
use vitalrs::energy::{ActivityLevel, BmrFormula, EnergyCalculator, Goal};
use vitalrs::heart_rate::{FitnessLevel, HeartRateProfile, HeartRateZoneCalculator};
use vitalrs::ideal_weight::{FrameSize, IdealWeightCalculator};
use vitalrs::models::{AnthropometricInput, DiagnosticKind, Gender, UnitSystem};
use vitalrs::report::HealthReport;
use vitalrs::sleep::{SleepCycleCalculator, SleepQualityInput, SleepQualityScorer, SleepStage};
use vitalrs::units::{FeetInches, UnitConverter};
use vitalrs::VitalsError;

/// Integration tests that exercise complete workflows through the public API

#[cfg(test)]
mod integration_tests {
    use super::*;
    use proptest::prelude::*;

    fn night(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn create_test_person() -> AnthropometricInput {
        AnthropometricInput::new(70.0, 175.0, 30, Gender::Male, UnitSystem::Metric).unwrap()
    }

    /// BMI computation and category for the reference adult
    #[test]
    fn test_reference_bmi() {
        let bmi = BmiCalculator::compute_bmi(70.0, 175.0, UnitSystem::Metric);
        assert_eq!(bmi, 22.9);
        assert_eq!(BmiCalculator::classify(bmi), BmiCategory::NormalWeight);
        assert_eq!(BmiCalculator::classify(bmi).label(), "Normal weight");

        // Same person entered in imperial units lands in the same category
        let weight_lb = UnitConverter::kg_to_lb(70.0);
        let height_in = UnitConverter::cm_to_inches(175.0);
        let imperial = BmiCalculator::compute_bmi(weight_lb, height_in, UnitSystem::Imperial);
        assert!((imperial - 22.9).abs() <= 0.1);
    }

    /// lb → kg → lb stays within one pound after user-facing rounding
    #[test]
    fn test_weight_conversion_round_trip() {
        for lb in [100.0, 154.0, 187.5, 250.0] {
            let kg = UnitConverter::imperial_to_metric_weight(lb);
            let back = UnitConverter::metric_to_imperial_weight(kg);
            assert!((back - lb).abs() <= 1.0, "{} → {} → {}", lb, kg, back);
        }
    }

    /// BMR for the reference adult follows 10·w + 6.25·h − 5·age + 5
    #[test]
    fn test_reference_bmr() {
        let bmr = EnergyCalculator::bmr(Gender::Male, 30, 70.0, 175.0, BmrFormula::MifflinStJeor, None);
        assert_eq!(bmr, 1649);

        // Katch-McArdle without body fat silently matches Mifflin
        let katch = EnergyCalculator::bmr(Gender::Male, 30, 70.0, 175.0, BmrFormula::KatchMcArdle, None);
        assert_eq!(katch, bmr);

        let estimate =
            EnergyCalculator::bmr_estimate(Gender::Male, 30, 70.0, 175.0, BmrFormula::KatchMcArdle, None);
        assert!(estimate.used_fallback());
    }

    /// Energy plan chain: BMR → TDEE → target → macros
    #[test]
    fn test_energy_plan_workflow() {
        let person = create_test_person();
        let plan = EnergyCalculator::plan(
            &person,
            BmrFormula::MifflinStJeor,
            None,
            ActivityLevel::parse_or_default("couch potato"),
            Goal::parse_or_default("lose"),
        );

        assert_eq!(plan.activity_level, ActivityLevel::Moderate);
        assert_eq!(plan.tdee, 2556);
        assert_eq!(plan.target_calories, 2056);
        assert!(plan.weekly_change_kg < 0.0);

        let macro_calories = plan.macros.protein.calories + plan.macros.carbs.calories + plan.macros.fat.calories;
        assert!((macro_calories - plan.target_calories).abs() <= 3);
    }

    /// Navy method returns the 0 sentinel when waist does not exceed neck
    #[test]
    fn test_navy_infeasible_measurements() {
        let estimate = BodyFatCalculator::navy_body_fat(Gender::Male, 30.0, 35.0, 175.0, None);
        assert_eq!(estimate.percentage, 0.0);
        assert_eq!(estimate.diagnostics[0].kind, DiagnosticKind::InfeasibleInput);
    }

    /// Women without a hip measurement get 0 plus a missing-measurement note
    #[test]
    fn test_navy_missing_hip_for_women() {
        let measurements = CircumferenceMeasurements::new(80.0, 33.0, None, 165.0, UnitSystem::Metric).unwrap();
        assert!(measurements.require_complete_for(Gender::Female).is_err());
        assert!(measurements.require_complete_for(Gender::Male).is_ok());

        let result = BodyFatCalculator::analyze_navy(Gender::Female, 35, &measurements, Some(60.0));
        assert_eq!(result.percentage, 0.0);
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::MissingMeasurement));
    }

    /// Zones are contiguous and anchored on resting HR and max HR
    #[test]
    fn test_heart_rate_zone_contiguity() {
        let profile = HeartRateProfile::new(40, 55, FitnessLevel::Intermediate);
        let result = HeartRateZoneCalculator::calculate(&profile);

        assert_eq!(result.zones.len(), 5);
        for pair in result.zones.windows(2) {
            assert_eq!(pair[0].max, pair[1].min);
        }

        let expected_z5_min = (55.0 + 0.9 * result.heart_rate_reserve as f64).round() as u16;
        assert_eq!(result.zones[3].max, expected_z5_min);
        assert_eq!(result.zones[4].min, expected_z5_min);
        assert_eq!(result.zones[4].max, result.max_hr);
    }

    /// Out-of-range inputs fall back to defaults instead of failing
    #[test]
    fn test_heart_rate_default_substitution() {
        let profile = HeartRateProfile::new(0, 200, FitnessLevel::parse_or_default("elite"));
        assert_eq!(profile.age(), 30);
        assert_eq!(profile.resting_hr(), 70);
        assert_eq!(profile.fitness_level(), FitnessLevel::Intermediate);
        assert_eq!(profile.diagnostics().len(), 2);

        let result = HeartRateZoneCalculator::calculate(&profile);
        assert_eq!(result.max_hr, 187);
    }

    /// Eight hours in bed decompose into contiguous stages totalling 480 minutes
    #[test]
    fn test_sleep_timeline_eight_hours() {
        let bed = night(22, 30);
        let wake = bed + Duration::hours(8);
        let timeline = SleepCycleCalculator::generate_timeline(bed, wake);

        assert!((timeline.total_minutes() - 480.0).abs() < 1e-9);
        for pair in timeline.intervals.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time);
        }
        assert_eq!(timeline.intervals[0].stage, SleepStage::FallingAsleep);
        assert_eq!(timeline.intervals.last().unwrap().end_time, wake);
    }

    /// Bedtime suggestions and the timeline agree on cycle boundaries
    #[test]
    fn test_bedtime_suggestion_matches_timeline() {
        let wake = night(23, 0) + Duration::hours(8);
        for suggestion in SleepCycleCalculator::calculate_bed_times(wake) {
            let timeline = SleepCycleCalculator::generate_timeline(suggestion.time, wake);
            assert_eq!(timeline.full_cycles, suggestion.cycles);
            assert_eq!(timeline.intervals.last().unwrap().stage, SleepStage::Rem);
        }
    }

    /// Sleeping the bracket midpoint earns the full duration score
    #[test]
    fn test_sleep_quality_midpoint() {
        for (age, midpoint) in [(1, 12.5), (4, 11.5), (10, 10.0), (16, 9.0), (40, 8.0), (70, 7.5)] {
            let input = SleepQualityInput::new(age, midpoint, 5, 0, 5, 5).unwrap();
            let result = SleepQualityScorer::score(&input);
            assert_eq!(result.breakdown.duration, 25.0, "age {}", age);
        }
    }

    /// A high diastolic alone escalates the category
    #[test]
    fn test_blood_pressure_asymmetry() {
        let category = BloodPressureAnalyzer::classify(125.0, 95.0);
        assert_eq!(category, BloodPressureCategory::HypertensionStage1);
        assert_eq!(category.label(), "Hypertension Stage 1");
    }

    /// Reading log round-trips through JSON and summarizes
    #[test]
    fn test_blood_pressure_log_workflow() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 7, 30, 0).unwrap();
        let readings: Vec<BloodPressureReading> = (0..14)
            .map(|day| {
                let reading = BloodPressureReading::new(118 + day as u16, 76 + (day % 5) as u16, start + Duration::days(day));
                if day % 2 == 0 {
                    reading.with_pulse(64 + day as u16)
                } else {
                    reading
                }
            })
            .collect();

        let json = serde_json::to_string(&readings).unwrap();
        let parsed: Vec<BloodPressureReading> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, readings);

        let summary = BloodPressureAnalyzer::summarize(&parsed).unwrap();
        assert_eq!(summary.count, 14);
        assert_eq!(summary.systolic.min, 118.0);
        assert_eq!(summary.systolic.max, 131.0);
        assert_eq!(summary.pulse.unwrap().mean, 70.0); // 64, 66, ..., 76

        let first_week = BloodPressureAnalyzer::filter_by_date_range(&parsed, start, start + Duration::days(6));
        assert_eq!(first_week.len(), 7);

        let elevated_or_worse = BloodPressureAnalyzer::readings_above(&parsed, BloodPressureCategory::Normal);
        assert!(elevated_or_worse.iter().all(|r| r.category() > BloodPressureCategory::Normal));
    }

    /// Smart constructors reject bad input at the boundary
    #[test]
    fn test_boundary_validation() {
        let err = AnthropometricInput::new(-70.0, 175.0, 30, Gender::Male, UnitSystem::Metric).unwrap_err();
        assert!(matches!(err, VitalsError::Validation(_)));

        assert!(SleepQualityInput::new(30, 8.0, 11, 0, 5, 5).is_err());
        assert!(CircumferenceMeasurements::new(0.0, 35.0, None, 175.0, UnitSystem::Metric).is_err());
        assert!("sideways".parse::<Gender>().is_err());
    }

    /// Boundary errors keep their severity behind anyhow context
    #[test]
    fn test_error_severity_through_context() {
        use anyhow::Context;
        use vitalrs::error::ErrorSeverity;

        let err = AnthropometricInput::new(0.0, 175.0, 30, Gender::Male, UnitSystem::Metric)
            .context("Failed to read body measurements")
            .unwrap_err();
        let cause = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<VitalsError>())
            .unwrap();
        assert_eq!(cause.severity(), ErrorSeverity::Warning);
        assert_eq!(cause.user_message(), "Please enter a weight greater than zero.");

        let temp_dir = tempfile::TempDir::new().unwrap();
        let broken = temp_dir.path().join("config.toml");
        std::fs::write(&broken, "[profile\nage = 30").unwrap();
        let err = AppConfig::load_or_default(Some(broken.as_path())).unwrap_err();
        let cause = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<VitalsError>())
            .unwrap();
        assert_eq!(cause.severity().to_tracing_level(), tracing::Level::ERROR);
    }

    /// Height entered in feet and inches matches the metric and imperial paths
    #[test]
    fn test_feet_and_inches_height() {
        let height: FeetInches = "5'9\"".parse().unwrap();

        let metric = BmiCalculator::compute_bmi(70.0, height.to_length(UnitSystem::Metric), UnitSystem::Metric);
        let imperial = BmiCalculator::compute_bmi(154.3, height.to_length(UnitSystem::Imperial), UnitSystem::Imperial);
        assert_eq!(metric, 22.9);
        assert!((metric - imperial).abs() < 0.15);
        assert_eq!(UnitConverter::cm_to_feet_inches(175.0), height);
    }

    /// A resting HR that was never entered is not reported as substituted
    #[test]
    fn test_heart_rate_without_resting_value() {
        let profile = HeartRateProfile::with_optional_resting(40, None, FitnessLevel::Beginner);
        let result = HeartRateZoneCalculator::calculate(&profile);
        assert_eq!(result.resting_hr, 70);
        assert!(result.diagnostics.is_empty());
    }

    /// Profile stored in the config drives a full report
    #[test]
    fn test_config_driven_report() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.profile.gender = Gender::Female;
        config.profile.age = Some(28);
        config.profile.height = Some(65.0);
        config.profile.weight = Some(140.0);
        config.profile.unit_system = UnitSystem::Imperial;
        config.profile.activity_level = ActivityLevel::Active;
        config.save_to_file(&path).unwrap();

        let loaded = AppConfig::load_or_default(Some(path.as_path())).unwrap();
        let profile = &loaded.profile;
        let input = AnthropometricInput::new(
            profile.weight.unwrap(),
            profile.height.unwrap(),
            profile.age.unwrap(),
            profile.gender,
            profile.unit_system,
        )
        .unwrap();

        let report = HealthReport::build(&input, profile.activity_level, profile.goal);
        assert_eq!(report.bmi.category, BmiCategory::NormalWeight);
        assert_eq!(report.energy.activity_level, ActivityLevel::Active);
        assert_eq!(report.energy.target_calories, report.energy.tdee);
        assert!(report.ideal_weight.range.min < report.ideal_weight.range.max);
    }

    proptest! {
        /// Ideal-weight range brackets the adjusted average
        #[test]
        fn test_ideal_weight_range_ordering(
            height in 140.0f64..210.0,
            female in any::<bool>(),
            age in 18u32..90,
            frame in prop_oneof![Just(FrameSize::Small), Just(FrameSize::Medium), Just(FrameSize::Large)]
        ) {
            let gender = if female { Gender::Female } else { Gender::Male };
            let result = IdealWeightCalculator::calculate(height, gender, age, frame, UnitSystem::Metric);
            prop_assert!(result.range.min < result.adjusted_average);
            prop_assert!(result.adjusted_average < result.range.max);
        }

        /// BMI category never drops as weight rises
        #[test]
        fn test_bmi_category_monotonic_in_weight(
            weight in 30.0f64..200.0,
            extra in 0.0f64..50.0,
            height in 140.0f64..210.0
        ) {
            let lighter = BmiCalculator::classify(BmiCalculator::compute_bmi(weight, height, UnitSystem::Metric));
            let heavier = BmiCalculator::classify(BmiCalculator::compute_bmi(weight + extra, height, UnitSystem::Metric));
            prop_assert!(heavier >= lighter);
        }
    }
}
