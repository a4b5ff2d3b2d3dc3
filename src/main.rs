use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tabled::{settings::Style, Table, Tabled};

use vitalrs::blood_pressure::{BloodPressureAnalyzer, BloodPressureCategory, BloodPressureReading};
use vitalrs::bmi::BmiCalculator;
use vitalrs::body_composition::{BodyFatCalculator, CircumferenceMeasurements};
use vitalrs::config::AppConfig;
use vitalrs::energy::{ActivityLevel, BmrFormula, EnergyCalculator, Goal};
use vitalrs::error::VitalsError;
use vitalrs::heart_rate::{FitnessLevel, HeartRateProfile, HeartRateZoneCalculator};
use vitalrs::ideal_weight::{FrameSize, IdealWeightCalculator};
use vitalrs::logging::{init_logging, log_diagnostics};
use vitalrs::models::{AnthropometricInput, Gender, UnitSystem};
use vitalrs::report::HealthReport;
use vitalrs::sleep::{SleepCycleCalculator, SleepQualityInput, SleepQualityScorer, SleepSuggestion};
use vitalrs::units::{FeetInches, UnitConverter};

/// VitalRS - Personal Health Metrics CLI
///
/// Body composition, energy balance, heart-rate zones, sleep timing and
/// blood-pressure analysis from a handful of measurements.
#[derive(Parser)]
#[command(name = "vitalrs")]
#[command(version = "0.1.0")]
#[command(about = "Personal health metrics CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Measurements shared by the body-composition commands
#[derive(clap::Args)]
struct BodyArgs {
    /// Body weight (kg or lb)
    #[arg(short, long)]
    weight: Option<f64>,

    /// Height (cm or in)
    #[arg(short = 'H', long, conflicts_with = "height_ft")]
    height: Option<f64>,

    /// Height in feet and inches, e.g. 5'9"
    #[arg(long, value_name = "FT'IN")]
    height_ft: Option<FeetInches>,

    /// Age in years
    #[arg(short, long)]
    age: Option<u32>,

    /// male or female
    #[arg(short, long)]
    gender: Option<Gender>,

    /// metric or imperial
    #[arg(short, long)]
    units: Option<UnitSystem>,
}

#[derive(Subcommand)]
enum Commands {
    /// Body-mass index and healthy weight band
    Bmi {
        #[command(flatten)]
        body: BodyArgs,
    },

    /// Body-fat percentage
    BodyFat {
        #[command(flatten)]
        body: BodyArgs,

        /// Estimation method
        #[arg(short, long, value_enum, default_value = "navy")]
        method: MethodArg,

        /// Waist circumference (cm or in)
        #[arg(long)]
        waist: Option<f64>,

        /// Neck circumference (cm or in)
        #[arg(long)]
        neck: Option<f64>,

        /// Hip circumference, needed for women (cm or in)
        #[arg(long)]
        hip: Option<f64>,
    },

    /// Consensus ideal weight from six formulas
    IdealWeight {
        #[command(flatten)]
        body: BodyArgs,

        /// Frame size (small, medium, large)
        #[arg(short, long, conflicts_with = "wrist")]
        frame: Option<FrameSize>,

        /// Wrist circumference to derive the frame size (cm or in)
        #[arg(long)]
        wrist: Option<f64>,
    },

    /// BMR, TDEE, calorie target and macro split
    Energy {
        #[command(flatten)]
        body: BodyArgs,

        /// Activity level (sedentary, light, moderate, active, very-active)
        #[arg(long)]
        activity: Option<String>,

        /// Weight goal (lose, maintain, gain)
        #[arg(long)]
        goal: Option<String>,

        /// BMR formula (mifflin, harris, katch)
        #[arg(long)]
        formula: Option<BmrFormula>,

        /// Body-fat percentage for Katch-McArdle
        #[arg(long)]
        body_fat: Option<f64>,
    },

    /// Calories burned by an activity
    Burn {
        /// Activity name (walking, running, cycling, ...)
        activity: String,

        /// Duration in minutes
        #[arg(short, long)]
        minutes: f64,

        /// Body weight (kg or lb)
        #[arg(short, long)]
        weight: Option<f64>,

        /// metric or imperial
        #[arg(short, long)]
        units: Option<UnitSystem>,
    },

    /// Heart-rate training zones
    HeartRate {
        /// Age in years
        #[arg(short, long)]
        age: Option<i32>,

        /// Resting heart rate (bpm)
        #[arg(short, long)]
        resting: Option<i32>,

        /// Fitness level (beginner, intermediate, advanced)
        #[arg(short, long)]
        fitness: Option<String>,

        /// Report which zone this heart rate falls in
        #[arg(long)]
        check: Option<u16>,
    },

    /// Sleep-cycle timing and sleep quality
    Sleep {
        #[command(subcommand)]
        action: SleepCommands,
    },

    /// Blood-pressure classification
    BloodPressure {
        /// Systolic pressure (mmHg)
        #[arg(short, long, requires = "diastolic")]
        systolic: Option<f64>,

        /// Diastolic pressure (mmHg)
        #[arg(short, long, requires = "systolic")]
        diastolic: Option<f64>,

        /// JSON file holding a list of readings to summarize
        #[arg(long, conflicts_with_all = ["systolic", "diastolic"])]
        log: Option<PathBuf>,

        /// With --log, only list readings above this category
        #[arg(long, value_enum, requires = "log")]
        above: Option<CategoryArg>,
    },

    /// Combined BMI, body-fat, ideal-weight and energy report
    Report {
        #[command(flatten)]
        body: BodyArgs,

        /// Activity level (sedentary, light, moderate, active, very-active)
        #[arg(long)]
        activity: Option<String>,

        /// Weight goal (lose, maintain, gain)
        #[arg(long)]
        goal: Option<String>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum SleepCommands {
    /// Stage-by-stage timeline between bed time and wake time
    Timeline {
        /// Bed time (HH:MM)
        #[arg(short, long)]
        bed: Option<String>,

        /// Wake time (HH:MM); earlier than bed time means the next day
        #[arg(short, long)]
        wake: Option<String>,
    },

    /// When to go to bed to wake up at the end of a cycle
    Bedtime {
        /// Wake time (HH:MM)
        #[arg(short, long)]
        wake: Option<String>,
    },

    /// When to wake up if going to bed now or at a given time
    WakeTime {
        /// Bed time (HH:MM), defaults to now
        #[arg(short, long)]
        bed: Option<String>,
    },

    /// Score last night's sleep
    Quality {
        /// Age in years
        #[arg(short, long)]
        age: Option<u32>,

        /// Hours slept
        #[arg(long)]
        hours: f64,

        /// Schedule consistency, 1-10
        #[arg(long)]
        consistency: u8,

        /// Number of times you woke up
        #[arg(long, default_value = "0")]
        wake_ups: u32,

        /// Bedroom environment, 1-10
        #[arg(long)]
        environment: u8,

        /// How rested you feel, 1-10
        #[arg(long)]
        feeling: u8,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    Navy,
    Bmi,
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    Low,
    Normal,
    Elevated,
    Stage1,
    Stage2,
}

impl From<CategoryArg> for BloodPressureCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Low => BloodPressureCategory::Low,
            CategoryArg::Normal => BloodPressureCategory::Normal,
            CategoryArg::Elevated => BloodPressureCategory::Elevated,
            CategoryArg::Stage1 => BloodPressureCategory::HypertensionStage1,
            CategoryArg::Stage2 => BloodPressureCategory::HypertensionStage2,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_config_path);
    let config = AppConfig::load_or_default(Some(config_path.as_path()))?;

    let mut log_config = config.logging.clone();
    log_config.level = log_config.level.raised_by(cli.verbose);
    init_logging(&log_config)?;

    let app = App {
        config,
        config_path,
        json: cli.json,
    };

    app.run(cli.command)
}

/// Log the full error chain and print a short message for the user
///
/// Boundary errors are logged at their own severity and shown through
/// `VitalsError::user_message`; anything else is shown as-is.
fn report_error(err: &anyhow::Error) {
    match err.chain().find_map(|cause| cause.downcast_ref::<VitalsError>()) {
        Some(vitals) => {
            if vitals.severity().to_tracing_level() == tracing::Level::ERROR {
                tracing::error!("{:#}", err);
            } else {
                tracing::warn!("{:#}", err);
            }
            eprintln!("{} {}", "Error:".red().bold(), err);
            eprintln!("  {}", vitals.user_message());
        }
        None => {
            tracing::error!("{:#}", err);
            eprintln!("{} {:#}", "Error:".red().bold(), err);
        }
    }
}

/// Loaded configuration plus global output flags
struct App {
    config: AppConfig,
    config_path: PathBuf,
    json: bool,
}

impl App {
    fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Bmi { body } => self.bmi(&body),
            Commands::BodyFat {
                body,
                method,
                waist,
                neck,
                hip,
            } => self.body_fat(&body, method, waist, neck, hip),
            Commands::IdealWeight { body, frame, wrist } => self.ideal_weight(&body, frame, wrist),
            Commands::Energy {
                body,
                activity,
                goal,
                formula,
                body_fat,
            } => self.energy(&body, activity.as_deref(), goal.as_deref(), formula, body_fat),
            Commands::Burn {
                activity,
                minutes,
                weight,
                units,
            } => self.burn(&activity, minutes, weight, units),
            Commands::HeartRate {
                age,
                resting,
                fitness,
                check,
            } => self.heart_rate(age, resting, fitness.as_deref(), check),
            Commands::Sleep { action } => self.sleep(action),
            Commands::BloodPressure {
                systolic,
                diastolic,
                log,
                above,
            } => self.blood_pressure(systolic, diastolic, log.as_deref(), above),
            Commands::Report { body, activity, goal } => {
                self.report(&body, activity.as_deref(), goal.as_deref())
            }
            Commands::Config { action } => self.manage_config(action),
        }
    }

    // ------------------------------------------------------------------
    // Input resolution: command-line flag first, then the stored profile
    // ------------------------------------------------------------------

    fn system(&self, units: Option<UnitSystem>) -> UnitSystem {
        units.unwrap_or(self.config.profile.unit_system)
    }

    fn gender(&self, gender: Option<Gender>) -> Gender {
        gender.unwrap_or(self.config.profile.gender)
    }

    fn weight(&self, weight: Option<f64>) -> Result<f64> {
        weight
            .or(self.config.profile.weight)
            .context("--weight is required (or set profile.weight in the config file)")
    }

    fn height(&self, body: &BodyArgs) -> Result<f64> {
        let system = self.system(body.units);
        body.height
            .or_else(|| body.height_ft.map(|h| h.to_length(system)))
            .or(self.config.profile.height)
            .context("--height is required (or set profile.height in the config file)")
    }

    fn age(&self, age: Option<u32>) -> Result<u32> {
        age.or(self.config.profile.age)
            .context("--age is required (or set profile.age in the config file)")
    }

    fn anthropometrics(&self, body: &BodyArgs) -> Result<AnthropometricInput> {
        let input = AnthropometricInput::new(
            self.weight(body.weight)?,
            self.height(body)?,
            self.age(body.age)?,
            self.gender(body.gender),
            self.system(body.units),
        )?;
        Ok(input)
    }

    fn activity_level(&self, activity: Option<&str>) -> ActivityLevel {
        match activity {
            Some(tag) => {
                if tag.parse::<ActivityLevel>().is_err() {
                    tracing::warn!("Unknown activity level '{}', using moderate", tag);
                }
                ActivityLevel::parse_or_default(tag)
            }
            None => self.config.profile.activity_level,
        }
    }

    fn goal(&self, goal: Option<&str>) -> Goal {
        match goal {
            Some(tag) => {
                if tag.parse::<Goal>().is_err() {
                    tracing::warn!("Unknown goal '{}', using maintain", tag);
                }
                Goal::parse_or_default(tag)
            }
            None => self.config.profile.goal,
        }
    }

    fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    fn bmi(&self, body: &BodyArgs) -> Result<()> {
        let system = self.system(body.units);
        let height = self.height(body)?;
        let result = BmiCalculator::analyze(self.weight(body.weight)?, height, system);
        log_diagnostics("bmi", &result.diagnostics);
        let feet_inches = UnitConverter::cm_to_feet_inches(UnitConverter::normalize_length_to_cm(height, system));

        self.emit(&result, |r| {
            println!("{}", "Body-Mass Index".bold());
            println!("  Height:   {} {} ({})", height, system.length_unit(), feet_inches);
            println!("  BMI:      {}", paint(&format!("{:.1}", r.bmi), &r.color).bold());
            println!("  Category: {}", paint(r.category.label(), &r.color));
            println!("  Risk:     {}", r.risk);
            println!(
                "  Healthy weight: {:.1} - {:.1} {}",
                r.ideal_weight.min,
                r.ideal_weight.max,
                r.system.weight_unit()
            );
            println!();
            for recommendation in &r.recommendations {
                println!("  • {}", recommendation);
            }
        })
    }

    fn body_fat(
        &self,
        body: &BodyArgs,
        method: MethodArg,
        waist: Option<f64>,
        neck: Option<f64>,
        hip: Option<f64>,
    ) -> Result<()> {
        let system = self.system(body.units);
        let gender = self.gender(body.gender);
        let age = self.age(body.age)?;

        let result = match method {
            MethodArg::Navy => {
                let measurements = CircumferenceMeasurements::new(
                    waist.context("--waist is required for the Navy method")?,
                    neck.context("--neck is required for the Navy method")?,
                    hip,
                    self.height(body)?,
                    system,
                )?;
                let weight_kg = body
                    .weight
                    .or(self.config.profile.weight)
                    .map(|w| UnitConverter::normalize_weight_to_kg(w, system));
                BodyFatCalculator::analyze_navy(gender, age, &measurements, weight_kg)
            }
            MethodArg::Bmi => BodyFatCalculator::analyze_bmi(
                gender,
                age,
                self.weight(body.weight)?,
                self.height(body)?,
                system,
            ),
        };
        log_diagnostics("body-fat", &result.diagnostics);

        self.emit(&result, |r| {
            println!("{} ({} method)", "Body Fat".bold(), r.method);
            println!("  Body fat: {}", format!("{:.1}%", r.percentage).bold());
            println!("  Category: {}", r.category.label().cyan());
            println!("  {}", r.description);
            println!("  Healthy range for your age: {:.0}-{:.0}%", r.ideal_range.min, r.ideal_range.max);
            if let (Some(fat), Some(lean)) = (r.fat_mass_kg, r.lean_mass_kg) {
                println!("  Fat mass:  {:.1} kg", fat);
                println!("  Lean mass: {:.1} kg", lean);
            }
        })
    }

    fn ideal_weight(&self, body: &BodyArgs, frame: Option<FrameSize>, wrist: Option<f64>) -> Result<()> {
        let system = self.system(body.units);
        let gender = self.gender(body.gender);
        let height = self.height(body)?;
        let age = self.age(body.age)?;

        let frame = match (frame, wrist) {
            (Some(frame), _) => frame,
            (None, Some(wrist)) => IdealWeightCalculator::frame_size(wrist, gender, height, system),
            (None, None) => FrameSize::default(),
        };

        let result = IdealWeightCalculator::calculate(height, gender, age, frame, system);
        log_diagnostics("ideal-weight", &result.diagnostics);

        self.emit(&result, |r| {
            #[derive(Tabled)]
            struct FormulaRow {
                #[tabled(rename = "Formula")]
                formula: &'static str,
                #[tabled(rename = "kg")]
                kg: String,
                #[tabled(rename = "lb")]
                lb: String,
            }

            let rows: Vec<FormulaRow> = r
                .formulas
                .named()
                .iter()
                .map(|(name, kg)| FormulaRow {
                    formula: *name,
                    kg: format!("{:.1}", kg),
                    lb: format!("{:.1}", UnitConverter::metric_to_imperial_weight(*kg)),
                })
                .collect();

            println!("{}", "Ideal Weight".bold());
            println!("{}", Table::new(rows).with(Style::rounded()));
            println!("  Average:     {:.1} kg", r.average);
            println!("  Frame:       {} ({:+.1} kg)", r.frame_size, r.frame_adjustment);
            println!("  Adjusted:    {}", format!("{:.1} kg", r.adjusted_average).green().bold());
            println!(
                "  Range:       {:.1} - {:.1} kg ({:.1} - {:.1} lb)",
                r.range.min, r.range.max, r.range_lb.min, r.range_lb.max
            );
        })
    }

    fn energy(
        &self,
        body: &BodyArgs,
        activity: Option<&str>,
        goal: Option<&str>,
        formula: Option<BmrFormula>,
        body_fat: Option<f64>,
    ) -> Result<()> {
        let input = self.anthropometrics(body)?;
        let formula = formula.unwrap_or(self.config.profile.bmr_formula);
        let result = EnergyCalculator::plan(
            &input,
            formula,
            body_fat,
            self.activity_level(activity),
            self.goal(goal),
        );

        if result.bmr.used_fallback() {
            tracing::warn!(
                requested = %result.bmr.requested,
                applied = %result.bmr.applied,
                "No body-fat percentage given, BMR formula fell back"
            );
        }

        self.emit(&result, |r| {
            #[derive(Tabled)]
            struct MacroRow {
                #[tabled(rename = "Macro")]
                name: &'static str,
                #[tabled(rename = "Grams")]
                grams: i32,
                #[tabled(rename = "kcal")]
                calories: i32,
                #[tabled(rename = "%")]
                percentage: String,
            }

            let rows = [
                ("Protein", r.macros.protein),
                ("Carbs", r.macros.carbs),
                ("Fat", r.macros.fat),
            ]
            .into_iter()
            .map(|(name, amount)| MacroRow {
                name,
                grams: amount.grams,
                calories: amount.calories,
                percentage: format!("{:.0}", amount.percentage),
            });

            println!("{}", "Energy Balance".bold());
            println!("  BMR ({}): {} kcal ({})", r.bmr.applied, r.bmr.calories, r.bmr_status);
            println!("  TDEE ({}): {} kcal", r.activity_level, r.tdee);
            println!(
                "  Target ({}): {}",
                r.goal,
                format!("{} kcal", r.target_calories).green().bold()
            );
            println!("  Expected change: {:+.2} kg/week", r.weekly_change_kg);
            println!("{}", Table::new(rows).with(Style::rounded()));
            println!("  {}", r.suggestion.rationale.dimmed());
        })
    }

    fn burn(&self, activity: &str, minutes: f64, weight: Option<f64>, units: Option<UnitSystem>) -> Result<()> {
        let system = self.system(units);
        let weight_kg = UnitConverter::normalize_weight_to_kg(self.weight(weight)?, system);

        if !EnergyCalculator::known_activities().any(|known| known.eq_ignore_ascii_case(activity.trim())) {
            tracing::warn!(
                "Unknown activity '{}', using a MET of {}",
                activity,
                EnergyCalculator::met_value(activity)
            );
        }

        #[derive(Serialize)]
        struct BurnOutput<'a> {
            activity: &'a str,
            met: f64,
            minutes: f64,
            calories: i32,
        }

        let output = BurnOutput {
            activity,
            met: EnergyCalculator::met_value(activity),
            minutes,
            calories: EnergyCalculator::activity_calories(weight_kg, minutes, activity),
        };

        self.emit(&output, |o| {
            println!(
                "{} for {:.0} min (MET {:.1}): {}",
                o.activity.bold(),
                o.minutes,
                o.met,
                format!("{} kcal", o.calories).green().bold()
            );
        })
    }

    fn heart_rate(
        &self,
        age: Option<i32>,
        resting: Option<i32>,
        fitness: Option<&str>,
        check: Option<u16>,
    ) -> Result<()> {
        let age = age
            .or(self.config.profile.age.map(|a| a as i32))
            .context("--age is required (or set profile.age in the config file)")?;
        let resting = resting.or(self.config.profile.resting_hr.map(i32::from));
        let fitness = fitness
            .map(FitnessLevel::parse_or_default)
            .unwrap_or(self.config.profile.fitness_level);

        let profile = HeartRateProfile::with_optional_resting(age, resting, fitness);
        let result = HeartRateZoneCalculator::calculate(&profile);
        log_diagnostics("heart-rate", &result.diagnostics);

        self.emit(&result, |r| {
            #[derive(Tabled)]
            struct ZoneRow {
                #[tabled(rename = "Zone")]
                zone: String,
                #[tabled(rename = "Name")]
                name: String,
                #[tabled(rename = "BPM")]
                range: String,
                #[tabled(rename = "Purpose")]
                description: String,
            }

            let rows: Vec<ZoneRow> = r
                .zones
                .iter()
                .map(|z| ZoneRow {
                    zone: format!("Z{}", z.zone),
                    name: z.name.clone(),
                    range: format!("{}-{}", z.min, z.max),
                    description: z.description.clone(),
                })
                .collect();

            println!("{}", "Heart-Rate Zones".bold());
            println!("  Max HR: {} bpm   Resting: {} bpm   Reserve: {} bpm", r.max_hr, r.resting_hr, r.heart_rate_reserve);
            println!("{}", Table::new(rows).with(Style::rounded()));
            println!("  Recovery HR: {} bpm", r.recovery_hr);
            println!("  Target HR ({}): {} bpm", r.fitness_level, r.target_hr.to_string().green().bold());
            println!("  Estimated VO2max: {} ml/kg/min", r.vo2max);

            if let Some(hr) = check {
                match HeartRateZoneCalculator::zone_for(hr, &r.zones) {
                    Some(zone) => println!("  {} bpm is in zone {}", hr, zone),
                    None => println!("  {} bpm is below zone 1", hr),
                }
            }
        })
    }

    fn sleep(&self, action: SleepCommands) -> Result<()> {
        let defaults = &self.config.sleep;

        match action {
            SleepCommands::Timeline { bed, wake } => {
                let bed = at_today(resolve_time(bed.as_deref(), defaults.bed_time)?);
                let wake = at_today(resolve_time(wake.as_deref(), defaults.wake_time)?);
                let timeline = SleepCycleCalculator::generate_timeline(bed, wake);

                self.emit(&timeline, |t| {
                    #[derive(Tabled)]
                    struct StageRow {
                        #[tabled(rename = "Cycle")]
                        cycle: String,
                        #[tabled(rename = "Stage")]
                        stage: String,
                        #[tabled(rename = "Start")]
                        start: String,
                        #[tabled(rename = "End")]
                        end: String,
                        #[tabled(rename = "Minutes")]
                        minutes: String,
                    }

                    let rows: Vec<StageRow> = t
                        .intervals
                        .iter()
                        .map(|i| StageRow {
                            cycle: i.cycle.map(|c| c.to_string()).unwrap_or_default(),
                            stage: i.stage.to_string(),
                            start: i.start_time.format("%H:%M:%S").to_string(),
                            end: i.end_time.format("%H:%M:%S").to_string(),
                            minutes: format!("{:.1}", i.duration_minutes),
                        })
                        .collect();

                    println!(
                        "{} {} → {} ({:.0} min, {} full cycles)",
                        "Sleep Timeline".bold(),
                        t.bed_time.format("%H:%M"),
                        t.wake_time.format("%H:%M"),
                        t.total_minutes(),
                        t.full_cycles
                    );
                    println!("{}", Table::new(rows).with(Style::rounded()));
                    for (stage, minutes) in t.stage_totals() {
                        println!(
                            "  {:<15} {:>6.1} min  {}",
                            stage.to_string(),
                            minutes,
                            stage.description().dimmed()
                        );
                    }
                })
            }
            SleepCommands::Bedtime { wake } => {
                let wake = at_today(resolve_time(wake.as_deref(), defaults.wake_time)?);
                let suggestions = SleepCycleCalculator::calculate_bed_times(wake);
                self.emit(&suggestions, |s| print_suggestions("Go to bed at", s))
            }
            SleepCommands::WakeTime { bed } => {
                let bed = match bed {
                    Some(text) => at_today(parse_clock(&text)?),
                    None => Local::now().naive_local(),
                };
                let suggestions = SleepCycleCalculator::calculate_wake_times(bed);
                self.emit(&suggestions, |s| print_suggestions("Wake up at", s))
            }
            SleepCommands::Quality {
                age,
                hours,
                consistency,
                wake_ups,
                environment,
                feeling,
            } => {
                let input = SleepQualityInput::new(
                    self.age(age)?,
                    hours,
                    consistency,
                    wake_ups,
                    environment,
                    feeling,
                )?;
                let result = SleepQualityScorer::score(&input);

                self.emit(&result, |r| {
                    #[derive(Tabled)]
                    struct ScoreRow {
                        #[tabled(rename = "Component")]
                        component: &'static str,
                        #[tabled(rename = "Score")]
                        score: String,
                        #[tabled(rename = "Max")]
                        max: u8,
                    }

                    let b = &r.breakdown;
                    let rows = [
                        ("Duration", b.duration, 25),
                        ("Consistency", b.consistency, 25),
                        ("Disruption", b.disruption, 20),
                        ("Environment", b.environment, 15),
                        ("Feeling", b.feeling, 15),
                    ]
                    .into_iter()
                    .map(|(component, score, max)| ScoreRow {
                        component,
                        score: format!("{:.1}", score),
                        max,
                    });

                    println!(
                        "{} {}/100 ({})",
                        "Sleep Quality".bold(),
                        r.total.to_string().bold(),
                        r.rating
                    );
                    println!("{}", Table::new(rows).with(Style::rounded()));
                    println!(
                        "  Recommended for your age: {:.0}-{:.0} hours",
                        r.recommended.min_hours, r.recommended.max_hours
                    );
                    println!("  {}", r.feedback);
                    for tip in &r.tips {
                        println!("  • {}", tip.yellow());
                    }
                })
            }
        }
    }

    fn blood_pressure(
        &self,
        systolic: Option<f64>,
        diastolic: Option<f64>,
        log: Option<&Path>,
        above: Option<CategoryArg>,
    ) -> Result<()> {
        if let Some(path) = log {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read readings file: {}", path.display()))?;
            let readings: Vec<BloodPressureReading> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse readings file: {}", path.display()))?;

            if let Some(threshold) = above {
                let flagged = BloodPressureAnalyzer::readings_above(&readings, threshold.into());
                return self.emit(&flagged, |f| {
                    for reading in f {
                        let category = reading.category();
                        println!(
                            "  {}  {}/{}  {}",
                            reading.timestamp.format("%Y-%m-%d %H:%M"),
                            reading.systolic,
                            reading.diastolic,
                            paint(category.label(), category.color())
                        );
                    }
                });
            }

            let summary = BloodPressureAnalyzer::summarize(&readings)
                .with_context(|| format!("No readings in {}", path.display()))?;

            return self.emit(&summary, |s| {
                println!(
                    "{} ({} readings, {} to {})",
                    "Blood Pressure Summary".bold(),
                    s.count,
                    s.first_reading.format("%Y-%m-%d"),
                    s.last_reading.format("%Y-%m-%d")
                );
                println!(
                    "  Average: {:.0}/{:.0} mmHg  {}",
                    s.systolic.mean,
                    s.diastolic.mean,
                    paint(&s.average.label, &s.average.color).bold()
                );
                println!("  Systolic:  {:.0}-{:.0} (sd {:.1})", s.systolic.min, s.systolic.max, s.systolic.std_dev);
                println!("  Diastolic: {:.0}-{:.0} (sd {:.1})", s.diastolic.min, s.diastolic.max, s.diastolic.std_dev);
                if let Some(pulse) = &s.pulse {
                    println!("  Pulse:     {:.0} bpm average", pulse.mean);
                }
                for category in BloodPressureCategory::ALL {
                    let count = BloodPressureAnalyzer::filter_by_category(&readings, category).len();
                    if count > 0 {
                        println!("  {:<22} {}", category.label(), count);
                    }
                }
            });
        }

        let systolic = systolic.context("--systolic and --diastolic, or --log, are required")?;
        let diastolic = diastolic.context("--diastolic is required")?;
        let analysis = BloodPressureAnalyzer::analyze(systolic, diastolic);

        self.emit(&analysis, |a| {
            println!("{} {:.0}/{:.0} mmHg", "Blood Pressure".bold(), a.systolic, a.diastolic);
            println!("  Category: {}", paint(&a.label, &a.color).bold());
            println!("  {}", a.description);
            println!("  Mean arterial pressure: {} mmHg", a.mean_arterial_pressure);
            println!("  Pulse pressure: {:.0} mmHg", a.pulse_pressure);
        })
    }

    fn report(&self, body: &BodyArgs, activity: Option<&str>, goal: Option<&str>) -> Result<()> {
        let input = self.anthropometrics(body)?;
        let report = HealthReport::build(&input, self.activity_level(activity), self.goal(goal));
        for diagnostic in report.diagnostics() {
            tracing::warn!(operation = "report", kind = ?diagnostic.kind, "{}", diagnostic.message);
        }

        self.emit(&report, |r| {
            let unit = r.input.system().weight_unit();
            println!("{}", "Health Report".bold().underline());
            println!(
                "  BMI:         {:.1} {}",
                r.bmi.bmi,
                paint(r.bmi.category.label(), &r.bmi.color)
            );
            println!("  Body fat:    {:.1}% ({})", r.body_fat.percentage, r.body_fat.category.label());
            println!(
                "  Ideal:       {:.1} kg ({:.1} - {:.1} kg){}",
                r.ideal_weight.adjusted_average,
                r.ideal_weight.range.min,
                r.ideal_weight.range.max,
                if r.within_ideal_range() { "" } else { "  ← outside range" }
            );
            println!("  Healthy BMI weight: {:.1} - {:.1} {}", r.bmi.ideal_weight.min, r.bmi.ideal_weight.max, unit);
            println!("  BMR / TDEE:  {} / {} kcal", r.energy.bmr.calories, r.energy.tdee);
            println!(
                "  Target:      {} ({})",
                format!("{} kcal", r.energy.target_calories).green().bold(),
                r.energy.goal
            );
        })
    }

    fn manage_config(&self, action: ConfigCommands) -> Result<()> {
        match action {
            ConfigCommands::Show => {
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&self.config)?);
                } else {
                    println!("{}", toml::to_string_pretty(&self.config)?);
                }
            }
            ConfigCommands::Init { force } => {
                if self.config_path.exists() && !force {
                    anyhow::bail!(
                        "Config file already exists at {} (use --force to overwrite)",
                        self.config_path.display()
                    );
                }
                let mut config = AppConfig::default();
                config.save_to_file(&self.config_path)?;
                println!("{} {}", "✓ Wrote".green(), self.config_path.display());
            }
            ConfigCommands::Path => println!("{}", self.config_path.display()),
        }
        Ok(())
    }
}

/// Paint `text` with one of the result color names
fn paint(text: &str, color: &str) -> ColoredString {
    match color {
        "blue" => text.blue(),
        "green" => text.green(),
        "yellow" => text.yellow(),
        "orange" => text.truecolor(255, 165, 0),
        "red" => text.red(),
        "darkred" => text.truecolor(139, 0, 0),
        "gray" => text.bright_black(),
        _ => text.normal(),
    }
}

fn parse_clock(text: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M")
        .with_context(|| format!("Invalid time '{}', expected HH:MM", text))
}

fn resolve_time(text: Option<&str>, default: NaiveTime) -> Result<NaiveTime> {
    text.map(parse_clock).unwrap_or(Ok(default))
}

fn at_today(time: NaiveTime) -> NaiveDateTime {
    Local::now().date_naive().and_time(time)
}

fn print_suggestions(heading: &str, suggestions: &[SleepSuggestion]) {
    for suggestion in suggestions {
        println!(
            "  {} {}  ({} cycles, {:.1} h of sleep)",
            heading,
            suggestion.time.format("%H:%M").to_string().green().bold(),
            suggestion.cycles,
            suggestion.sleep_minutes as f64 / 60.0
        );
    }
}
