use serde::{Deserialize, Serialize};

/// Formatting and normalization defaults passed explicitly to the functions
/// that need them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// chrono format string for locale-style dates
    pub date_format: String,
    /// chrono format string for locale-style times
    pub time_format: String,
    /// Index into [`crate::phone::COUNTRY_RULES`]
    pub default_country_rule: usize,
    /// Type tag given to phones that arrive without one
    pub default_empty_phone_type: String,
    /// Drop the time part of birthdays/anniversaries when writing
    pub skip_time_from_date: bool,
    /// Report type tags outside the standard tables while importing
    pub warn_on_non_standard_types: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            date_format: "%d.%m.%Y".to_string(),
            time_format: "%H:%M:%S".to_string(),
            default_country_rule: 0,
            // many phones treat "voice" as "other"
            default_empty_phone_type: "voice".to_string(),
            skip_time_from_date: false,
            warn_on_non_standard_types: true,
        }
    }
}
