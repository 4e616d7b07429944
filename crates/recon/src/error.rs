use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconError {
    /// Strictness level outside 1..=5.
    #[error("priority level must be between 1 and {max}, got {level}")]
    InvalidLevel { level: u8, max: u8 },
    /// Country rule index past the end of the rule table.
    #[error("unknown country rule {0}")]
    UnknownCountryRule(usize),
}
