use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::models::{default_ceiling, default_goal, metric};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// General application settings
    pub settings: AppSettings,

    /// Per-metric chart ceilings (the value that fills a bar)
    pub ceilings: HashMap<String, Decimal>,

    /// Per-metric daily goals
    pub goals: HashMap<String, Decimal>,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Locale tag for weekday labels (e.g. "en", "pt-BR")
    pub locale: String,

    /// Directory record files are resolved against when relative
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let known = [
            metric::STEPS,
            metric::CALORIES,
            metric::WATER_ML,
            metric::SLEEP_HOURS,
            metric::ACTIVE_MINUTES,
        ];

        let mut ceilings = HashMap::new();
        let mut goals = HashMap::new();
        for name in known {
            if let Some(ceiling) = default_ceiling(name) {
                ceilings.insert(name.to_string(), ceiling);
            }
            if let Some(goal) = default_goal(name) {
                goals.insert(name.to_string(), goal);
            }
        }

        let now = Utc::now();
        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            settings: AppSettings {
                locale: "en".to_string(),
                data_dir: PathBuf::from("."),
            },
            ceilings,
            goals,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".weeklens")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        match Self::load_from_file(Self::default_config_path()) {
            Ok(config) => config,
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to the default location
    pub fn save(&mut self) -> Result<()> {
        self.save_to_file(Self::default_config_path())
    }

    /// Resolve a record file path, joining relative paths onto `data_dir`
    pub fn resolve_record_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.settings.data_dir.join(path)
        }
    }

    /// Ceiling for a metric, falling back to the registry default
    pub fn ceiling_for(&self, name: &str) -> Option<Decimal> {
        self.ceilings
            .get(name)
            .copied()
            .or_else(|| default_ceiling(name))
    }

    /// Goal for a metric, falling back to the registry default
    pub fn goal_for(&self, name: &str) -> Option<Decimal> {
        self.goals.get(name).copied().or_else(|| default_goal(name))
    }

    /// Look up a dotted configuration key (`locale`, `goal.<metric>`,
    /// `ceiling.<metric>`)
    pub fn get_value(&self, key: &str) -> Option<String> {
        match key.split_once('.') {
            None if key == "locale" => Some(self.settings.locale.clone()),
            None if key == "data_dir" => Some(self.settings.data_dir.display().to_string()),
            Some(("goal", name)) => self.goal_for(name).map(|v| v.to_string()),
            Some(("ceiling", name)) => self.ceiling_for(name).map(|v| v.to_string()),
            _ => None,
        }
    }

    /// Set a dotted configuration key from its string representation
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key.split_once('.') {
            None if key == "locale" => {
                self.settings.locale = value.to_string();
            }
            None if key == "data_dir" => {
                self.settings.data_dir = PathBuf::from(value);
            }
            Some(("goal", name)) => {
                let parsed = parse_positive(value)
                    .with_context(|| format!("Invalid goal value: {}", value))?;
                self.goals.insert(name.to_string(), parsed);
            }
            Some(("ceiling", name)) => {
                let parsed = parse_positive(value)
                    .with_context(|| format!("Invalid ceiling value: {}", value))?;
                self.ceilings.insert(name.to_string(), parsed);
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }
        self.metadata.updated_at = Utc::now();
        Ok(())
    }

    /// All configuration entries as display pairs
    pub fn list_values(&self) -> Vec<(String, String)> {
        let mut entries = vec![
            ("locale".to_string(), self.settings.locale.clone()),
            (
                "data_dir".to_string(),
                self.settings.data_dir.display().to_string(),
            ),
        ];

        let mut goals: Vec<_> = self.goals.iter().collect();
        goals.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in goals {
            entries.push((format!("goal.{}", name), value.to_string()));
        }

        let mut ceilings: Vec<_> = self.ceilings.iter().collect();
        ceilings.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in ceilings {
            entries.push((format!("ceiling.{}", name), value.to_string()));
        }

        entries
    }
}

fn parse_positive(value: &str) -> Result<Decimal> {
    let parsed = Decimal::from_str(value.trim())
        .map_err(|e| anyhow::anyhow!("not a number: {}", e))?;
    if parsed <= Decimal::ZERO {
        anyhow::bail!("must be positive");
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_cover_known_metrics() {
        let config = AppConfig::default();
        assert_eq!(config.ceiling_for(metric::STEPS), Some(dec!(12000)));
        assert_eq!(config.goal_for(metric::WATER_ML), Some(dec!(2000)));
        assert_eq!(config.settings.locale, "en");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.set_value("goal.steps", "8000").unwrap();
        config.set_value("locale", "pt-BR").unwrap();
        config.save_to_file(&path).unwrap();

        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.goal_for(metric::STEPS), Some(dec!(8000)));
        assert_eq!(loaded.settings.locale, "pt-BR");
    }

    #[test]
    fn test_get_and_set_values() {
        let mut config = AppConfig::default();
        assert_eq!(config.get_value("locale").as_deref(), Some("en"));
        assert_eq!(config.get_value("goal.steps").as_deref(), Some("10000"));
        assert_eq!(config.get_value("nope"), None);

        config.set_value("ceiling.steps", "15000").unwrap();
        assert_eq!(config.ceiling_for(metric::STEPS), Some(dec!(15000)));

        assert!(config.set_value("goal.steps", "abc").is_err());
        assert!(config.set_value("goal.steps", "-5").is_err());
        assert!(config.set_value("bogus.key.here", "1").is_err());
    }

    #[test]
    fn test_resolve_record_path() {
        let mut config = AppConfig::default();
        config.set_value("data_dir", "/data/health").unwrap();

        assert_eq!(
            config.resolve_record_path(Path::new("records.csv")),
            PathBuf::from("/data/health/records.csv")
        );
        // absolute paths are left alone
        assert_eq!(
            config.resolve_record_path(Path::new("/tmp/records.csv")),
            PathBuf::from("/tmp/records.csv")
        );
    }

    #[test]
    fn test_list_values_contains_goals_and_ceilings() {
        let config = AppConfig::default();
        let entries = config.list_values();
        assert!(entries.iter().any(|(k, _)| k == "goal.steps"));
        assert!(entries.iter().any(|(k, _)| k == "ceiling.water_ml"));
    }
}
