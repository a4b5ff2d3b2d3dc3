use anyhow::{Context, Result};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::energy::{ActivityLevel, BmrFormula, Goal};
use crate::error::VitalsError;
use crate::heart_rate::FitnessLevel;
use crate::logging::LogConfig;
use crate::models::{Gender, UnitSystem};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Personal defaults used when a flag is not given on the command line
    #[serde(default)]
    pub profile: ProfileDefaults,

    /// Sleep calculator defaults
    #[serde(default)]
    pub sleep: SleepDefaults,

    /// Logging settings
    #[serde(default)]
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Stored personal profile
///
/// Height and weight are in the units of `unit_system`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDefaults {
    pub gender: Gender,
    pub age: Option<u32>,
    pub unit_system: UnitSystem,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    pub bmr_formula: BmrFormula,
    pub fitness_level: FitnessLevel,
    pub resting_hr: Option<u16>,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        ProfileDefaults {
            gender: Gender::default(),
            age: None,
            unit_system: UnitSystem::default(),
            height: None,
            weight: None,
            activity_level: ActivityLevel::default(),
            goal: Goal::default(),
            bmr_formula: BmrFormula::default(),
            fitness_level: FitnessLevel::default(),
            resting_hr: None,
        }
    }
}

/// Default times for the bedtime / wake-time calculators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepDefaults {
    pub wake_time: NaiveTime,
    pub bed_time: NaiveTime,
}

impl Default for SleepDefaults {
    fn default() -> Self {
        SleepDefaults {
            wake_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or_default(),
            bed_time: NaiveTime::from_hms_opt(23, 0, 0).unwrap_or_default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();
        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            profile: ProfileDefaults::default(),
            sleep: SleepDefaults::default(),
            logging: LogConfig::default(),
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .map_err(VitalsError::from)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| VitalsError::Configuration(e.to_string()))
            .with_context(|| format!("Failed to parse TOML configuration: {}", path.as_ref().display()))?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .map_err(VitalsError::from)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .map_err(|e| VitalsError::Configuration(e.to_string()))
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .map_err(VitalsError::from)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vitalrs")
            .join("config.toml")
    }

    /// Load `path` (or the default path), falling back to defaults when absent
    ///
    /// A file that exists but does not parse is an error; a missing file is not.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        if !config_path.exists() {
            tracing::debug!("Config file not found, using defaults: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from_file(&config_path)
    }
}
