use crate::error::{Result, YieldSimError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Reduction thresholds and ranges consumed by the stage rules.
///
/// Built once at start-up and passed by reference into every rule. Field
/// names serialize to the environment variable names that override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Thresholds {
    pub bloom_frost_reduction_min: f64,
    pub bloom_frost_reduction_max: f64,
    pub bloom_frost_max_streak: f64,
    pub bloom_temp_low: f64,
    pub bloom_temp_high: f64,
    pub bloom_temp_reduction_min: f64,
    pub bloom_temp_reduction_max: f64,
    pub bloom_rain_threshold: f64,
    pub bloom_rain_reduction: f64,
    pub bloom_wind_threshold: f64,
    pub bloom_wind_reduction: f64,
    pub fruit_set_heat_threshold: f64,
    pub fruit_set_heat_reduction_min: f64,
    pub fruit_set_heat_reduction_max: f64,
    pub fruit_set_heat_min_streak: f64,
    pub fruit_set_heat_max_streak: f64,
    pub fruit_set_hot_dry_temp: f64,
    pub fruit_set_hot_dry_rain: f64,
    pub fruit_set_hot_dry_reduction_min: f64,
    pub fruit_set_hot_dry_reduction_max: f64,
    pub fruit_set_hot_dry_min_streak: f64,
    pub fruit_set_hot_dry_max_streak: f64,
    pub fruit_growth_drought_streak: f64,
    pub fruit_growth_drought_reduction: f64,
    pub fruit_growth_heat_threshold: f64,
    pub fruit_growth_heat_reduction: f64,
    pub pre_harvest_wind_threshold: f64,
    pub pre_harvest_wind_reduction_min: f64,
    pub pre_harvest_wind_reduction_max: f64,
}

/// Every key accepted from the environment or a threshold file.
pub const THRESHOLD_KEYS: [&str; 29] = [
    "BLOOM_FROST_REDUCTION_MIN",
    "BLOOM_FROST_REDUCTION_MAX",
    "BLOOM_FROST_MAX_STREAK",
    "BLOOM_TEMP_LOW",
    "BLOOM_TEMP_HIGH",
    "BLOOM_TEMP_REDUCTION_MIN",
    "BLOOM_TEMP_REDUCTION_MAX",
    "BLOOM_RAIN_THRESHOLD",
    "BLOOM_RAIN_REDUCTION",
    "BLOOM_WIND_THRESHOLD",
    "BLOOM_WIND_REDUCTION",
    "FRUIT_SET_HEAT_THRESHOLD",
    "FRUIT_SET_HEAT_REDUCTION_MIN",
    "FRUIT_SET_HEAT_REDUCTION_MAX",
    "FRUIT_SET_HEAT_MIN_STREAK",
    "FRUIT_SET_HEAT_MAX_STREAK",
    "FRUIT_SET_HOT_DRY_TEMP",
    "FRUIT_SET_HOT_DRY_RAIN",
    "FRUIT_SET_HOT_DRY_REDUCTION_MIN",
    "FRUIT_SET_HOT_DRY_REDUCTION_MAX",
    "FRUIT_SET_HOT_DRY_MIN_STREAK",
    "FRUIT_SET_HOT_DRY_MAX_STREAK",
    "FRUIT_GROWTH_DROUGHT_STREAK",
    "FRUIT_GROWTH_DROUGHT_REDUCTION",
    "FRUIT_GROWTH_HEAT_THRESHOLD",
    "FRUIT_GROWTH_HEAT_REDUCTION",
    "PRE_HARVEST_WIND_THRESHOLD",
    "PRE_HARVEST_WIND_REDUCTION_MIN",
    "PRE_HARVEST_WIND_REDUCTION_MAX",
];

impl Thresholds {
    /// Resolve each key: environment override, then file value, then fallback.
    ///
    /// An override that does not parse as a finite number is ignored without
    /// error and the next layer is used.
    pub fn resolve<F>(env: F, file: &BTreeMap<String, f64>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str, fallback: f64| -> f64 {
            env(key)
                .and_then(|raw| parse_override(&raw))
                .or_else(|| file.get(key).copied())
                .unwrap_or(fallback)
        };

        let fruit_set_heat_threshold = value("FRUIT_SET_HEAT_THRESHOLD", 32.0);

        Self {
            bloom_frost_reduction_min: value("BLOOM_FROST_REDUCTION_MIN", 50.0),
            bloom_frost_reduction_max: value("BLOOM_FROST_REDUCTION_MAX", 90.0),
            bloom_frost_max_streak: value("BLOOM_FROST_MAX_STREAK", 5.0),
            bloom_temp_low: value("BLOOM_TEMP_LOW", 12.0),
            bloom_temp_high: value("BLOOM_TEMP_HIGH", 28.0),
            bloom_temp_reduction_min: value("BLOOM_TEMP_REDUCTION_MIN", 5.0),
            bloom_temp_reduction_max: value("BLOOM_TEMP_REDUCTION_MAX", 15.0),
            bloom_rain_threshold: value("BLOOM_RAIN_THRESHOLD", 20.0),
            bloom_rain_reduction: value("BLOOM_RAIN_REDUCTION", 10.0),
            bloom_wind_threshold: value("BLOOM_WIND_THRESHOLD", 30.0),
            bloom_wind_reduction: value("BLOOM_WIND_REDUCTION", 5.0),
            fruit_set_heat_threshold,
            fruit_set_heat_reduction_min: value("FRUIT_SET_HEAT_REDUCTION_MIN", 1.0),
            fruit_set_heat_reduction_max: value("FRUIT_SET_HEAT_REDUCTION_MAX", 5.0),
            fruit_set_heat_min_streak: value("FRUIT_SET_HEAT_MIN_STREAK", 2.0),
            fruit_set_heat_max_streak: value("FRUIT_SET_HEAT_MAX_STREAK", 5.0),
            // Hot-dry temperature tracks the heat threshold unless set on its own
            fruit_set_hot_dry_temp: value("FRUIT_SET_HOT_DRY_TEMP", fruit_set_heat_threshold),
            fruit_set_hot_dry_rain: value("FRUIT_SET_HOT_DRY_RAIN", 2.0),
            fruit_set_hot_dry_reduction_min: value("FRUIT_SET_HOT_DRY_REDUCTION_MIN", 1.0),
            fruit_set_hot_dry_reduction_max: value("FRUIT_SET_HOT_DRY_REDUCTION_MAX", 5.0),
            fruit_set_hot_dry_min_streak: value("FRUIT_SET_HOT_DRY_MIN_STREAK", 2.0),
            fruit_set_hot_dry_max_streak: value("FRUIT_SET_HOT_DRY_MAX_STREAK", 5.0),
            fruit_growth_drought_streak: value("FRUIT_GROWTH_DROUGHT_STREAK", 4.0),
            fruit_growth_drought_reduction: value("FRUIT_GROWTH_DROUGHT_REDUCTION", 0.5),
            fruit_growth_heat_threshold: value("FRUIT_GROWTH_HEAT_THRESHOLD", 35.0),
            fruit_growth_heat_reduction: value("FRUIT_GROWTH_HEAT_REDUCTION", 0.2),
            pre_harvest_wind_threshold: value("PRE_HARVEST_WIND_THRESHOLD", 40.0),
            pre_harvest_wind_reduction_min: value("PRE_HARVEST_WIND_REDUCTION_MIN", 5.0),
            pre_harvest_wind_reduction_max: value("PRE_HARVEST_WIND_REDUCTION_MAX", 20.0),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::resolve(|_| None, &BTreeMap::new())
    }
}

fn parse_override(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub thresholds: Thresholds,
    /// Threshold file that was applied, if any
    pub source: Option<PathBuf>,
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) if !p.exists() => {
                return Err(YieldSimError::Config(format!(
                    "Config file not found at {:?}",
                    p
                )));
            }
            Some(p) => Some(p),
            None => Self::find_config_path(),
        };

        let file_values = match &config_path {
            Some(path) => {
                tracing::debug!("Loading thresholds from {}", path.display());
                Self::read_threshold_file(path)?
            }
            None => BTreeMap::new(),
        };

        Ok(Self {
            thresholds: Thresholds::resolve(|key| std::env::var(key).ok(), &file_values),
            source: config_path,
        })
    }

    /// Search for a threshold file in standard locations.
    fn find_config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config/yieldsim.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("yieldsim").join("config.yaml"))
            .filter(|p| p.exists())
    }

    fn read_threshold_file(path: &Path) -> Result<BTreeMap<String, f64>> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| YieldSimError::Config(format!("Failed to read config: {}", e)))?;
        Self::parse_threshold_file(&content)
    }

    fn parse_threshold_file(content: &str) -> Result<BTreeMap<String, f64>> {
        let content = Self::substitute_env_vars(content)?;

        let is_blank = content
            .lines()
            .map(str::trim)
            .all(|line| line.is_empty() || line.starts_with('#'));
        if is_blank {
            return Ok(BTreeMap::new());
        }

        let raw: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(&content)
            .map_err(|e| YieldSimError::Config(format!("Failed to parse config: {}", e)))?;

        let mut values = BTreeMap::new();
        for (key, value) in raw {
            if !THRESHOLD_KEYS.contains(&key.as_str()) {
                tracing::warn!("Ignoring unknown threshold key {}", key);
                continue;
            }

            let parsed = match &value {
                serde_yaml::Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
                serde_yaml::Value::String(s) => parse_override(s),
                _ => None,
            };

            match parsed {
                Some(v) => {
                    values.insert(key, v);
                }
                None => tracing::warn!("Ignoring non-numeric value for {}", key),
            }
        }

        Ok(values)
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| YieldSimError::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }
}
