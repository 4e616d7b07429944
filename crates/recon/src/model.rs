use serde::Serialize;
use twincard_engine::PairState;

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Outcome counts of one comparison run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompareSummary {
    pub level: u8,
    pub primary_records: usize,
    pub secondary_records: usize,
    /// Pairs (counted once, not per side)
    pub identical: usize,
    pub similar: usize,
    pub primary_unpaired: usize,
    pub secondary_unpaired: usize,
}

impl CompareSummary {
    pub fn pairs(&self) -> usize {
        self.identical + self.similar
    }
}

// ---------------------------------------------------------------------------
// Report rows
// ---------------------------------------------------------------------------

/// One record's pairing outcome, for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairEntry {
    pub index: usize,
    pub visible_name: String,
    pub state: PairState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair_index: Option<usize>,
}
