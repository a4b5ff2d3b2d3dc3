//! Sleep-cycle timing, stage timeline and sleep-quality scoring
//!
//! # Sleep architecture model
//!
//! A night starts with a fixed 14-minute falling-asleep period followed by
//! 90-minute cycles, each split as:
//! - NREM 1: 5% (4.5 min)
//! - NREM 2: 45% (40.5 min)
//! - NREM 3: 25% (22.5 min)
//! - REM: 25% (22.5 min)
//!
//! Time left after the last full cycle is filled with a truncated cycle in
//! the same stage order, cut off at wake time.
//!
//! # Quality score (0-100)
//!
//! | Component   | Max | Rule                                                    |
//! |-------------|-----|---------------------------------------------------------|
//! | Duration    | 25  | full inside age range, -8/h short, -5/h long            |
//! | Consistency | 25  | 2.5 per point on a 1-10 scale                           |
//! | Disruption  | 20  | -5 per wake-up                                          |
//! | Environment | 15  | 1.5 per point on a 1-10 scale                           |
//! | Feeling     | 15  | 1.5 per point on a 1-10 scale                           |

use crate::error::{Result, ValidationError};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::units::round_whole;

/// Minutes needed to fall asleep
pub const FALL_ASLEEP_MINUTES: i64 = 14;

/// Length of one full sleep cycle in minutes
pub const CYCLE_MINUTES: i64 = 90;

/// Cycle counts offered by the bedtime / wake-time calculators
pub const SUGGESTED_CYCLES: [u32; 3] = [4, 5, 6];

const MS_PER_MINUTE: i64 = 60_000;
const FALL_ASLEEP_MS: i64 = FALL_ASLEEP_MINUTES * MS_PER_MINUTE;
const CYCLE_MS: i64 = CYCLE_MINUTES * MS_PER_MINUTE;

/// Stage order and share of a cycle, in percent
const CYCLE_STAGES: [(SleepStage, i64); 4] = [
    (SleepStage::Nrem1, 5),
    (SleepStage::Nrem2, 45),
    (SleepStage::Nrem3, 25),
    (SleepStage::Rem, 25),
];

/// Sleep stage label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepStage {
    FallingAsleep,
    Nrem1,
    Nrem2,
    Nrem3,
    Rem,
}

impl SleepStage {
    pub const ALL: [SleepStage; 5] = [
        SleepStage::FallingAsleep,
        SleepStage::Nrem1,
        SleepStage::Nrem2,
        SleepStage::Nrem3,
        SleepStage::Rem,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            SleepStage::FallingAsleep => "Transition from wakefulness to sleep",
            SleepStage::Nrem1 => "Light sleep, easily awakened",
            SleepStage::Nrem2 => "Body temperature drops and heart rate slows",
            SleepStage::Nrem3 => "Deep restorative sleep, tissue repair",
            SleepStage::Rem => "Dreaming and memory consolidation",
        }
    }
}

impl fmt::Display for SleepStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SleepStage::FallingAsleep => write!(f, "Falling Asleep"),
            SleepStage::Nrem1 => write!(f, "NREM 1"),
            SleepStage::Nrem2 => write!(f, "NREM 2"),
            SleepStage::Nrem3 => write!(f, "NREM 3"),
            SleepStage::Rem => write!(f, "REM"),
        }
    }
}

/// One contiguous stage interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepStageInterval {
    pub stage: SleepStage,
    /// 1-based cycle index; `None` for the falling-asleep period
    pub cycle: Option<u32>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_minutes: f64,
}

impl SleepStageInterval {
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }
}

/// Ordered, contiguous stage intervals from bed time to wake time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepTimeline {
    pub bed_time: NaiveDateTime,
    pub wake_time: NaiveDateTime,
    pub full_cycles: u32,
    pub intervals: Vec<SleepStageInterval>,
}

impl SleepTimeline {
    pub fn total_duration(&self) -> Duration {
        self.intervals
            .iter()
            .fold(Duration::zero(), |acc, interval| acc + interval.duration())
    }

    pub fn total_minutes(&self) -> f64 {
        self.intervals.iter().map(|i| i.duration_minutes).sum()
    }

    /// Minutes spent in each stage, in `SleepStage::ALL` order
    pub fn stage_totals(&self) -> Vec<(SleepStage, f64)> {
        SleepStage::ALL
            .iter()
            .map(|&stage| {
                let minutes = self
                    .intervals
                    .iter()
                    .filter(|i| i.stage == stage)
                    .map(|i| i.duration_minutes)
                    .sum();
                (stage, minutes)
            })
            .collect()
    }
}

/// Suggested bed or wake time for a whole number of cycles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSuggestion {
    pub time: NaiveDateTime,
    pub cycles: u32,
    /// Sleep time excluding the falling-asleep period
    pub sleep_minutes: i64,
}

/// Sleep-cycle timing utilities
pub struct SleepCycleCalculator;

impl SleepCycleCalculator {
    /// Decompose the night into stage intervals
    ///
    /// A wake time earlier than the bed time is taken to be on the next day.
    /// Equal times produce an empty timeline.
    pub fn generate_timeline(bed_time: NaiveDateTime, wake_time: NaiveDateTime) -> SleepTimeline {
        let wake_time = if wake_time < bed_time {
            wake_time + Duration::days(1)
        } else {
            wake_time
        };

        let mut builder = TimelineBuilder::new(bed_time, (wake_time - bed_time).num_milliseconds());

        builder.push(SleepStage::FallingAsleep, None, FALL_ASLEEP_MS);

        let full_cycles = builder.remaining_ms / CYCLE_MS;
        for cycle in 1..=full_cycles {
            for (stage, pct) in CYCLE_STAGES {
                builder.push(stage, Some(cycle as u32), CYCLE_MS * pct / 100);
            }
        }

        // Truncated final cycle
        let partial = full_cycles as u32 + 1;
        for (stage, pct) in CYCLE_STAGES {
            builder.push(stage, Some(partial), CYCLE_MS * pct / 100);
        }

        tracing::debug!(
            intervals = builder.intervals.len(),
            full_cycles,
            "Sleep timeline generated"
        );

        SleepTimeline {
            bed_time,
            wake_time,
            full_cycles: full_cycles as u32,
            intervals: builder.intervals,
        }
    }

    /// Bed times giving 6, 5 and 4 full cycles before `wake_time`, earliest first
    pub fn calculate_bed_times(wake_time: NaiveDateTime) -> Vec<SleepSuggestion> {
        SUGGESTED_CYCLES
            .iter()
            .rev()
            .map(|&cycles| SleepSuggestion {
                time: wake_time - Self::time_in_bed(cycles),
                cycles,
                sleep_minutes: cycles as i64 * CYCLE_MINUTES,
            })
            .collect()
    }

    /// Wake times after 4, 5 and 6 full cycles from `bed_time`, earliest first
    pub fn calculate_wake_times(bed_time: NaiveDateTime) -> Vec<SleepSuggestion> {
        SUGGESTED_CYCLES
            .iter()
            .map(|&cycles| SleepSuggestion {
                time: bed_time + Self::time_in_bed(cycles),
                cycles,
                sleep_minutes: cycles as i64 * CYCLE_MINUTES,
            })
            .collect()
    }

    fn time_in_bed(cycles: u32) -> Duration {
        Duration::minutes(cycles as i64 * CYCLE_MINUTES + FALL_ASLEEP_MINUTES)
    }
}

/// Appends intervals until the time budget is spent
struct TimelineBuilder {
    cursor: NaiveDateTime,
    remaining_ms: i64,
    intervals: Vec<SleepStageInterval>,
}

impl TimelineBuilder {
    fn new(start: NaiveDateTime, total_ms: i64) -> Self {
        Self {
            cursor: start,
            remaining_ms: total_ms.max(0),
            intervals: Vec::new(),
        }
    }

    /// Emit `stage` for up to `ms`; nothing when the budget is exhausted
    fn push(&mut self, stage: SleepStage, cycle: Option<u32>, ms: i64) {
        let allotted = ms.min(self.remaining_ms);
        if allotted <= 0 {
            return;
        }

        let end = self.cursor + Duration::milliseconds(allotted);
        self.intervals.push(SleepStageInterval {
            stage,
            cycle,
            start_time: self.cursor,
            end_time: end,
            duration_minutes: allotted as f64 / MS_PER_MINUTE as f64,
        });
        self.cursor = end;
        self.remaining_ms -= allotted;
    }
}

// ============================================================================
// SLEEP QUALITY
// ============================================================================

const DURATION_MAX: f64 = 25.0;
const CONSISTENCY_MAX: f64 = 25.0;
const DISRUPTION_MAX: f64 = 20.0;
const ENVIRONMENT_MAX: f64 = 15.0;
const FEELING_MAX: f64 = 15.0;

/// Points lost per hour below / above the recommended range
const SHORTFALL_PENALTY_PER_HOUR: f64 = 8.0;
const EXCESS_PENALTY_PER_HOUR: f64 = 5.0;

const DISRUPTION_PENALTY_PER_WAKE: f64 = 5.0;

/// Components scoring below this share of their maximum get a tip
const TIP_THRESHOLD: f64 = 0.6;

/// Self-reported night of sleep, 1-10 scales validated at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepQualityInput {
    age: u32,
    hours_slept: f64,
    consistency: u8,
    wake_ups: u32,
    environment: u8,
    feeling: u8,
}

impl SleepQualityInput {
    pub fn new(
        age: u32,
        hours_slept: f64,
        consistency: u8,
        wake_ups: u32,
        environment: u8,
        feeling: u8,
    ) -> Result<Self> {
        if !hours_slept.is_finite() || !(0.0..=24.0).contains(&hours_slept) {
            return Err(ValidationError::OutOfRange {
                field: "hours slept".to_string(),
                min: 0.0,
                max: 24.0,
                value: hours_slept,
            }
            .into());
        }
        for (field, value) in [
            ("consistency", consistency),
            ("environment", environment),
            ("feeling", feeling),
        ] {
            if !(1..=10).contains(&value) {
                return Err(ValidationError::OutOfRange {
                    field: field.to_string(),
                    min: 1.0,
                    max: 10.0,
                    value: value as f64,
                }
                .into());
            }
        }

        Ok(Self {
            age,
            hours_slept,
            consistency,
            wake_ups,
            environment,
            feeling,
        })
    }
}

/// Factor contributing to the sleep score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepFactor {
    Duration,
    Consistency,
    Disruption,
    Environment,
    Feeling,
}

impl SleepFactor {
    pub fn tip(&self) -> &'static str {
        SLEEP_TIPS[*self as usize]
    }
}

/// Indexed by `SleepFactor` ordinal
static SLEEP_TIPS: [&str; 5] = [
    "Plan your bedtime so you get the recommended hours for your age.",
    "Go to bed and wake up at the same time every day, including weekends.",
    "Limit fluids and caffeine late in the day to reduce night-time awakenings.",
    "Keep your bedroom dark, quiet and cool (around 18°C / 65°F).",
    "Wind down with a relaxing routine and avoid screens for an hour before bed.",
];

/// Per-component sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepScoreBreakdown {
    pub duration: f64,
    pub consistency: f64,
    pub disruption: f64,
    pub environment: f64,
    pub feeling: f64,
}

impl SleepScoreBreakdown {
    pub fn sum(&self) -> f64 {
        self.duration + self.consistency + self.disruption + self.environment + self.feeling
    }

    fn with_caps(&self) -> [(SleepFactor, f64, f64); 5] {
        [
            (SleepFactor::Duration, self.duration, DURATION_MAX),
            (SleepFactor::Consistency, self.consistency, CONSISTENCY_MAX),
            (SleepFactor::Disruption, self.disruption, DISRUPTION_MAX),
            (SleepFactor::Environment, self.environment, ENVIRONMENT_MAX),
            (SleepFactor::Feeling, self.feeling, FEELING_MAX),
        ]
    }
}

/// Overall sleep-quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepRating {
    VeryPoor,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SleepRating {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => SleepRating::Excellent,
            75..=89 => SleepRating::Good,
            60..=74 => SleepRating::Fair,
            40..=59 => SleepRating::Poor,
            _ => SleepRating::VeryPoor,
        }
    }

    pub fn feedback(&self) -> &'static str {
        match self {
            SleepRating::Excellent => "Excellent sleep! Keep up your current habits.",
            SleepRating::Good => "Good sleep with a little room for improvement.",
            SleepRating::Fair => "Fair sleep. Small changes to your routine could help.",
            SleepRating::Poor => "Poor sleep. Review the tips below to improve your rest.",
            SleepRating::VeryPoor => {
                "Very poor sleep. Consider speaking with a healthcare provider if this persists."
            }
        }
    }
}

impl fmt::Display for SleepRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SleepRating::Excellent => "Excellent",
            SleepRating::Good => "Good",
            SleepRating::Fair => "Fair",
            SleepRating::Poor => "Poor",
            SleepRating::VeryPoor => "Very Poor",
        };
        write!(f, "{}", label)
    }
}

/// Recommended nightly sleep for an age bracket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendedSleep {
    pub min_hours: f64,
    pub max_hours: f64,
}

/// Complete sleep-quality evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepQualityResult {
    pub breakdown: SleepScoreBreakdown,
    pub total: u8,
    pub rating: SleepRating,
    pub feedback: String,
    pub recommended: RecommendedSleep,
    pub tips: Vec<String>,
}

/// Sleep-quality scoring utilities
pub struct SleepQualityScorer;

impl SleepQualityScorer {
    /// National Sleep Foundation recommendation for an age
    pub fn recommended_sleep(age: u32) -> RecommendedSleep {
        let (min_hours, max_hours) = match age {
            0..=2 => (11.0, 14.0),
            3..=5 => (10.0, 13.0),
            6..=13 => (9.0, 11.0),
            14..=17 => (8.0, 10.0),
            18..=64 => (7.0, 9.0),
            _ => (7.0, 8.0),
        };
        RecommendedSleep { min_hours, max_hours }
    }

    pub fn duration_score(hours_slept: f64, age: u32) -> f64 {
        let range = Self::recommended_sleep(age);
        let score = if hours_slept < range.min_hours {
            DURATION_MAX - (range.min_hours - hours_slept) * SHORTFALL_PENALTY_PER_HOUR
        } else if hours_slept > range.max_hours {
            DURATION_MAX - (hours_slept - range.max_hours) * EXCESS_PENALTY_PER_HOUR
        } else {
            DURATION_MAX
        };
        score.clamp(0.0, DURATION_MAX)
    }

    pub fn disruption_score(wake_ups: u32) -> f64 {
        (DISRUPTION_MAX - wake_ups as f64 * DISRUPTION_PENALTY_PER_WAKE).max(0.0)
    }

    /// Scale a 1-10 rating linearly onto `0..=max`
    fn scale_score(rating: u8, max: f64) -> f64 {
        (rating as f64 / 10.0 * max).clamp(0.0, max)
    }

    pub fn score(input: &SleepQualityInput) -> SleepQualityResult {
        let breakdown = SleepScoreBreakdown {
            duration: Self::duration_score(input.hours_slept, input.age),
            consistency: Self::scale_score(input.consistency, CONSISTENCY_MAX),
            disruption: Self::disruption_score(input.wake_ups),
            environment: Self::scale_score(input.environment, ENVIRONMENT_MAX),
            feeling: Self::scale_score(input.feeling, FEELING_MAX),
        };

        let total = round_whole(breakdown.sum()).clamp(0.0, 100.0) as u8;
        let rating = SleepRating::from_score(total);

        let tips = breakdown
            .with_caps()
            .iter()
            .filter(|(_, score, cap)| *score < cap * TIP_THRESHOLD)
            .map(|(factor, _, _)| factor.tip().to_string())
            .collect();

        tracing::debug!(total, %rating, "Sleep quality scored");

        SleepQualityResult {
            breakdown,
            total,
            rating,
            feedback: rating.feedback().to_string(),
            recommended: Self::recommended_sleep(input.age),
            tips,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_eight_hour_timeline() {
        let timeline = SleepCycleCalculator::generate_timeline(at(1, 23, 0), at(2, 7, 0));

        assert_eq!(timeline.full_cycles, 5); // (480 - 14) / 90 = 5.18
        assert_eq!(timeline.total_duration(), Duration::hours(8));
        assert!((timeline.total_minutes() - 480.0).abs() < 1e-9);

        // Falling asleep + 5 × 4 stages + truncated NREM1/NREM2
        assert_eq!(timeline.intervals.len(), 23);
        assert_eq!(timeline.intervals[0].stage, SleepStage::FallingAsleep);
        assert_eq!(timeline.intervals[0].duration_minutes, 14.0);

        let last_two = &timeline.intervals[21..];
        assert_eq!(last_two[0].stage, SleepStage::Nrem1);
        assert_eq!(last_two[0].duration_minutes, 4.5);
        assert_eq!(last_two[1].stage, SleepStage::Nrem2);
        assert_eq!(last_two[1].duration_minutes, 11.5);
        assert_eq!(last_two[1].cycle, Some(6));
        assert_eq!(last_two[1].end_time, at(2, 7, 0));
    }

    #[test]
    fn test_timeline_is_contiguous() {
        let timeline = SleepCycleCalculator::generate_timeline(at(1, 22, 17), at(2, 6, 43));
        assert_eq!(timeline.intervals.first().unwrap().start_time, at(1, 22, 17));
        assert_eq!(timeline.intervals.last().unwrap().end_time, at(2, 6, 43));
        for pair in timeline.intervals.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time);
        }
    }

    #[test]
    fn test_full_cycle_stage_split() {
        let timeline = SleepCycleCalculator::generate_timeline(at(1, 22, 0), at(1, 23, 44));
        let minutes: Vec<f64> = timeline.intervals.iter().map(|i| i.duration_minutes).collect();
        assert_eq!(minutes, vec![14.0, 4.5, 40.5, 22.5, 22.5]);
        assert_eq!(timeline.full_cycles, 1);
    }

    #[test]
    fn test_wake_before_bed_rolls_over() {
        let timeline = SleepCycleCalculator::generate_timeline(at(1, 23, 0), at(1, 7, 0));
        assert_eq!(timeline.wake_time, at(2, 7, 0));
        assert_eq!(timeline.total_duration(), Duration::hours(8));
    }

    #[test]
    fn test_short_and_empty_timelines() {
        let timeline = SleepCycleCalculator::generate_timeline(at(1, 23, 0), at(1, 23, 10));
        assert_eq!(timeline.intervals.len(), 1);
        assert_eq!(timeline.intervals[0].stage, SleepStage::FallingAsleep);
        assert_eq!(timeline.intervals[0].duration_minutes, 10.0);

        let timeline = SleepCycleCalculator::generate_timeline(at(1, 23, 0), at(1, 23, 0));
        assert!(timeline.intervals.is_empty());
        assert_eq!(timeline.full_cycles, 0);
    }

    #[test]
    fn test_stage_totals() {
        let timeline = SleepCycleCalculator::generate_timeline(at(1, 23, 0), at(2, 7, 0));
        let totals = timeline.stage_totals();
        assert_eq!(totals[0], (SleepStage::FallingAsleep, 14.0));
        assert_eq!(totals[1], (SleepStage::Nrem1, 27.0)); // 6 × 4.5
        assert_eq!(totals[2], (SleepStage::Nrem2, 214.0)); // 5 × 40.5 + 11.5
        assert_eq!(totals[3], (SleepStage::Nrem3, 112.5));
        assert_eq!(totals[4], (SleepStage::Rem, 112.5));
    }

    #[test]
    fn test_bed_time_suggestions() {
        let suggestions = SleepCycleCalculator::calculate_bed_times(at(2, 7, 0));
        let times: Vec<NaiveDateTime> = suggestions.iter().map(|s| s.time).collect();
        // 7:00 - (n × 90 + 14) min
        assert_eq!(times, vec![at(1, 21, 46), at(1, 23, 16), at(2, 0, 46)]);
        assert_eq!(suggestions[0].cycles, 6);
        assert_eq!(suggestions[2].sleep_minutes, 360);
    }

    #[test]
    fn test_wake_time_suggestions() {
        let suggestions = SleepCycleCalculator::calculate_wake_times(at(1, 23, 0));
        let times: Vec<NaiveDateTime> = suggestions.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![at(2, 5, 14), at(2, 6, 44), at(2, 8, 14)]);
        assert_eq!(suggestions[0].cycles, 4);
    }

    #[test]
    fn test_duration_score() {
        // Adult midpoint of 7-9 hours
        assert_eq!(SleepQualityScorer::duration_score(8.0, 30), 25.0);
        assert_eq!(SleepQualityScorer::duration_score(6.0, 30), 17.0);
        assert_eq!(SleepQualityScorer::duration_score(10.0, 30), 20.0);
        assert_eq!(SleepQualityScorer::duration_score(2.0, 30), 0.0);
        // Teenager range 8-10
        assert_eq!(SleepQualityScorer::duration_score(9.0, 16), 25.0);
        assert_eq!(SleepQualityScorer::duration_score(7.5, 70), 25.0);
    }

    #[test]
    fn test_quality_score() {
        let input = SleepQualityInput::new(30, 8.0, 8, 1, 7, 8).unwrap();
        let result = SleepQualityScorer::score(&input);

        assert_eq!(result.breakdown.duration, 25.0);
        assert_eq!(result.breakdown.consistency, 20.0);
        assert_eq!(result.breakdown.disruption, 15.0);
        assert_eq!(result.breakdown.environment, 10.5);
        assert_eq!(result.breakdown.feeling, 12.0);
        assert_eq!(result.total, 83); // 82.5 rounded
        assert_eq!(result.rating, SleepRating::Good);
        assert!(result.tips.is_empty());
    }

    #[test]
    fn test_quality_extremes() {
        let best = SleepQualityScorer::score(&SleepQualityInput::new(30, 8.0, 10, 0, 10, 10).unwrap());
        assert_eq!(best.total, 100);
        assert_eq!(best.rating, SleepRating::Excellent);

        let worst = SleepQualityScorer::score(&SleepQualityInput::new(30, 0.0, 1, 10, 1, 1).unwrap());
        assert_eq!(worst.breakdown.disruption, 0.0);
        assert_eq!(worst.total, 6); // 2.5 + 1.5 + 1.5 = 5.5
        assert_eq!(worst.rating, SleepRating::VeryPoor);
        assert_eq!(worst.tips.len(), 5);
    }

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(SleepRating::from_score(90), SleepRating::Excellent);
        assert_eq!(SleepRating::from_score(89), SleepRating::Good);
        assert_eq!(SleepRating::from_score(75), SleepRating::Good);
        assert_eq!(SleepRating::from_score(60), SleepRating::Fair);
        assert_eq!(SleepRating::from_score(40), SleepRating::Poor);
        assert_eq!(SleepRating::from_score(39), SleepRating::VeryPoor);
    }

    #[test]
    fn test_input_validation() {
        assert!(SleepQualityInput::new(30, -1.0, 5, 0, 5, 5).is_err());
        assert!(SleepQualityInput::new(30, 25.0, 5, 0, 5, 5).is_err());
        assert!(SleepQualityInput::new(30, 8.0, 0, 0, 5, 5).is_err());
        assert!(SleepQualityInput::new(30, 8.0, 5, 0, 11, 5).is_err());
    }

    #[test]
    fn test_tips_table_complete() {
        for factor in [
            SleepFactor::Duration,
            SleepFactor::Consistency,
            SleepFactor::Disruption,
            SleepFactor::Environment,
            SleepFactor::Feeling,
        ] {
            assert!(!factor.tip().is_empty());
        }
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_timeline_properties(start_min in 0i64..1440, length_ms in 0i64..(16 * 3_600_000)) {
            let bed = at(1, 0, 0) + Duration::minutes(start_min);
            let wake = bed + Duration::milliseconds(length_ms);
            let timeline = SleepCycleCalculator::generate_timeline(bed, wake);

            prop_assert_eq!(timeline.total_duration(), Duration::milliseconds(length_ms));
            for pair in timeline.intervals.windows(2) {
                prop_assert_eq!(pair[0].end_time, pair[1].start_time);
            }
            for interval in &timeline.intervals {
                prop_assert!(interval.end_time > interval.start_time);
            }
        }

        #[test]
        fn test_quality_bounds(
            age in 0u32..100,
            hours in 0.0f64..24.0,
            consistency in 1u8..=10,
            wake_ups in 0u32..20,
            environment in 1u8..=10,
            feeling in 1u8..=10
        ) {
            let input = SleepQualityInput::new(age, hours, consistency, wake_ups, environment, feeling).unwrap();
            let result = SleepQualityScorer::score(&input);
            prop_assert!(result.total <= 100);
            prop_assert!(result.breakdown.duration >= 0.0 && result.breakdown.duration <= 25.0);
        }
    }
}
