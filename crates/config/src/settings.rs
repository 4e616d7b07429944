// User settings
// Loaded from ~/.config/twincard/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use twincard_engine::date::is_valid_format;
use twincard_engine::phone::COUNTRY_RULES;
use twincard_engine::FormatOptions;
use twincard_recon::{CompareOptions, MAX_COMPARE_PRIORITY_LEVEL};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Locale
    #[serde(rename = "locale.dateFormat")]
    pub date_format: String,

    #[serde(rename = "locale.timeFormat")]
    pub time_format: String,

    // Saving
    #[serde(rename = "saving.defaultCountryRule")]
    pub default_country_rule: usize,

    #[serde(rename = "saving.skipTimeFromDate")]
    pub skip_time_from_date: bool,

    // Loading
    #[serde(rename = "loading.defaultEmptyPhoneType")]
    pub default_empty_phone_type: String,

    #[serde(rename = "loading.warnOnNonStandardTypes")]
    pub warn_on_non_standard_types: bool,

    // Comparison
    #[serde(rename = "compare.priorityLevel")]
    pub priority_level: u8,

    /// Expand national numbers with the default country rule before comparing
    #[serde(rename = "compare.useCountryRule")]
    pub compare_use_country_rule: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let format = FormatOptions::default();
        Self {
            date_format: format.date_format,
            time_format: format.time_format,
            default_country_rule: format.default_country_rule,
            skip_time_from_date: format.skip_time_from_date,
            default_empty_phone_type: format.default_empty_phone_type,
            warn_on_non_standard_types: format.warn_on_non_standard_types,
            priority_level: CompareOptions::default().level,
            compare_use_country_rule: false,
        }
    }
}

const DEFAULT_SETTINGS_JSON: &str = r#"{
    // Locale (chrono format strings)
    "locale.dateFormat": "%d.%m.%Y",
    "locale.timeFormat": "%H:%M:%S",

    // Saving
    // Country rule index, see `twincard country-rules`
    "saving.defaultCountryRule": 0,
    "saving.skipTimeFromDate": false,

    // Loading
    "loading.defaultEmptyPhoneType": "voice",
    "loading.warnOnNonStandardTypes": true,

    // Comparison: 1 (loosest) to 5 (strictest)
    "compare.priorityLevel": 3,
    "compare.useCountryRule": false
}
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("twincard");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults.
    ///
    /// A missing file is created with commented defaults. Unreadable or
    /// invalid files are logged and ignored.
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            if let Err(e) = Self::create_default_file(&path) {
                log::warn!("{e}");
            }
            return settings;
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&contents)?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        let settings: Self = serde_json::from_str(&cleaned)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, pattern) in [
            ("locale.dateFormat", &self.date_format),
            ("locale.timeFormat", &self.time_format),
        ] {
            if !is_valid_format(pattern) {
                return Err(ConfigError::Invalid {
                    key,
                    message: format!("{pattern:?} is not a valid date/time format"),
                });
            }
        }
        if self.default_country_rule >= COUNTRY_RULES.len() {
            return Err(ConfigError::Invalid {
                key: "saving.defaultCountryRule",
                message: format!(
                    "{} is not a known rule (0..{})",
                    self.default_country_rule,
                    COUNTRY_RULES.len()
                ),
            });
        }
        if !(1..=MAX_COMPARE_PRIORITY_LEVEL).contains(&self.priority_level) {
            return Err(ConfigError::Invalid {
                key: "compare.priorityLevel",
                message: format!(
                    "{} is outside 1..={MAX_COMPARE_PRIORITY_LEVEL}",
                    self.priority_level
                ),
            });
        }
        Ok(())
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(io_error)
    }

    /// Create default settings file with comments
    fn create_default_file(path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, DEFAULT_SETTINGS_JSON).map_err(io_error)
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            date_format: self.date_format.clone(),
            time_format: self.time_format.clone(),
            default_country_rule: self.default_country_rule,
            default_empty_phone_type: self.default_empty_phone_type.clone(),
            skip_time_from_date: self.skip_time_from_date,
            warn_on_non_standard_types: self.warn_on_non_standard_types,
        }
    }

    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            country_rule: self.compare_use_country_rule.then_some(self.default_country_rule),
            ..CompareOptions::with_level(self.priority_level)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commented_default_file_matches_defaults() {
        assert_eq!(Settings::from_json(DEFAULT_SETTINGS_JSON).unwrap(), Settings::default());
    }

    #[test]
    fn missing_keys_take_defaults() {
        let settings = Settings::from_json(r#"{ "compare.priorityLevel": 5 }"#).unwrap();
        assert_eq!(settings.priority_level, 5);
        assert_eq!(settings.default_empty_phone_type, "voice");
        assert!(settings.warn_on_non_standard_types);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = Settings::from_json(r#"{ "compare.priorityLevel": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("compare.priorityLevel"));

        let err = Settings::from_json(r#"{ "saving.defaultCountryRule": 42 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "saving.defaultCountryRule", .. }));
    }

    #[test]
    fn unusable_date_formats_are_rejected() {
        let err = Settings::from_json(r#"{ "locale.dateFormat": "%Q" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "locale.dateFormat", .. }));

        let err = Settings::from_json(r#"{ "locale.timeFormat": "%H:%" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "locale.timeFormat", .. }));

        assert!(Settings::from_json(r#"{ "locale.dateFormat": "%Y/%m/%d" }"#).is_ok());
    }

    #[test]
    fn broken_json_is_a_parse_error() {
        assert!(matches!(Settings::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn options_follow_settings() {
        let settings = Settings {
            date_format: "%Y/%m/%d".into(),
            default_country_rule: 1,
            priority_level: 4,
            compare_use_country_rule: true,
            ..Settings::default()
        };
        let format = settings.format_options();
        assert_eq!(format.date_format, "%Y/%m/%d");
        assert_eq!(format.default_country_rule, 1);

        let compare = settings.compare_options();
        assert_eq!(compare.level, 4);
        assert_eq!(compare.country_rule, Some(1));
        assert_eq!(Settings::default().compare_options().country_rule, None);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            priority_level: 2,
            skip_time_from_date: true,
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
