use twincard_engine::{ContactList, PairState};

use crate::model::CompareSummary;

/// Compute summary counts from the pairing annotations on both lists.
pub fn compute_summary(primary: &ContactList, secondary: &ContactList, level: u8) -> CompareSummary {
    let mut identical = 0;
    let mut similar = 0;
    let mut primary_unpaired = 0;

    for item in primary {
        match item.pair_state {
            PairState::Identical => identical += 1,
            PairState::Similar => similar += 1,
            PairState::NotFound => primary_unpaired += 1,
        }
    }

    let secondary_unpaired = secondary
        .iter()
        .filter(|item| item.pair_state == PairState::NotFound)
        .count();

    CompareSummary {
        level,
        primary_records: primary.len(),
        secondary_records: secondary.len(),
        identical,
        similar,
        primary_unpaired,
        secondary_unpaired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twincard_engine::ContactItem;

    fn with_state(state: PairState) -> ContactItem {
        ContactItem {
            pair_state: state,
            ..ContactItem::default()
        }
    }

    #[test]
    fn summary_counts() {
        let primary: ContactList = vec![
            with_state(PairState::Identical),
            with_state(PairState::Similar),
            with_state(PairState::Similar),
            with_state(PairState::NotFound),
        ]
        .into_iter()
        .collect();
        let secondary: ContactList = vec![
            with_state(PairState::Identical),
            with_state(PairState::Similar),
            with_state(PairState::Similar),
            with_state(PairState::NotFound),
            with_state(PairState::NotFound),
        ]
        .into_iter()
        .collect();

        let summary = compute_summary(&primary, &secondary, 2);
        assert_eq!(summary.level, 2);
        assert_eq!(summary.identical, 1);
        assert_eq!(summary.similar, 2);
        assert_eq!(summary.pairs(), 3);
        assert_eq!(summary.primary_unpaired, 1);
        assert_eq!(summary.secondary_unpaired, 2);
        assert_eq!(summary.secondary_records, 5);
    }
}
