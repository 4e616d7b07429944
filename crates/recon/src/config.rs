use serde::{Deserialize, Serialize};
use twincard_engine::phone::COUNTRY_RULES;

use crate::error::ReconError;

/// Strictest similarity level. Level 1 is the loosest.
pub const MAX_COMPARE_PRIORITY_LEVEL: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOptions {
    /// Similarity strictness, 1 (loosest) to 5 (strictest)
    pub level: u8,
    /// Country rule applied to phones before comparing them. `None` compares
    /// numbers as written (formatting stripped).
    #[serde(default)]
    pub country_rule: Option<usize>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            level: 3,
            country_rule: None,
        }
    }
}

impl CompareOptions {
    /// Options at `level`, clamped into 1..=5.
    pub fn with_level(level: u8) -> Self {
        Self {
            level: level.clamp(1, MAX_COMPARE_PRIORITY_LEVEL),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if !(1..=MAX_COMPARE_PRIORITY_LEVEL).contains(&self.level) {
            return Err(ReconError::InvalidLevel {
                level: self.level,
                max: MAX_COMPARE_PRIORITY_LEVEL,
            });
        }
        if let Some(rule) = self.country_rule {
            if rule >= COUNTRY_RULES.len() {
                return Err(ReconError::UnknownCountryRule(rule));
            }
        }
        Ok(())
    }
}
