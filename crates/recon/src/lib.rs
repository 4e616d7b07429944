//! `twincard-recon`: pairs records across two contact lists.
//!
//! Pure engine crate: receives loaded lists, writes pairing annotations.
//! No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod matcher;
pub mod model;

pub use config::{CompareOptions, MAX_COMPARE_PRIORITY_LEVEL};
pub use engine::{compare_with, pair_entries};
pub use error::ReconError;
pub use matcher::{identical_to, similar_to, MatchEvidence};
pub use model::{CompareSummary, PairEntry};
