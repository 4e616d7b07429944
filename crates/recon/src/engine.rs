use twincard_engine::{ContactList, PairRef, PairState};

use crate::config::CompareOptions;
use crate::evidence::compute_summary;
use crate::matcher::{MatchEvidence, MatchKeys};
use crate::model::{CompareSummary, PairEntry};

/// Pair every record of `list` with at most one record of `pair_list`.
///
/// Pairing annotations on both lists are reset first. For each primary
/// record, in list order, the first secondary record that is identical wins;
/// failing that, the first one similar at `options.level`. Secondary records
/// already taken by an earlier primary record are skipped, so each pair is
/// mutual: if `a` points at `b`, `b` points back at `a` with the same state.
///
/// The first qualifying candidate is kept even when a later one would fit
/// better; this is not a globally optimal assignment.
///
/// Both lists must stay alive and unchanged while their pairing handles are
/// used. The engine never fails: an unpaired record ends as
/// [`PairState::NotFound`].
pub fn compare_with(
    list: &mut ContactList,
    pair_list: &mut ContactList,
    options: &CompareOptions,
) -> CompareSummary {
    debug_assert_ne!(list.id(), pair_list.id(), "a list cannot be compared with itself");
    let level = options.level.clamp(1, crate::config::MAX_COMPARE_PRIORITY_LEVEL);
    list.clear_pairing();
    pair_list.clear_pairing();

    let decisions = find_pairs(list, pair_list, options, level);

    let (list_id, pair_list_id) = (list.id(), pair_list.id());
    for &(li, ri, state) in &decisions {
        let left = &mut list[li];
        left.pair_state = state;
        left.pair = Some(PairRef { list: pair_list_id, index: ri });

        let right = &mut pair_list[ri];
        right.pair_state = state;
        right.pair = Some(PairRef { list: list_id, index: li });
    }

    let summary = compute_summary(list, pair_list, level);
    log::info!(
        "compared {} x {} records at level {}: {} identical, {} similar, {}/{} unpaired",
        summary.primary_records,
        summary.secondary_records,
        level,
        summary.identical,
        summary.similar,
        summary.primary_unpaired,
        summary.secondary_unpaired,
    );
    summary
}

/// Read-only scan: decide pairs without touching either list.
fn find_pairs(
    list: &ContactList,
    pair_list: &ContactList,
    options: &CompareOptions,
    level: u8,
) -> Vec<(usize, usize, PairState)> {
    let left_keys: Vec<MatchKeys<'_>> = list.iter().map(|i| MatchKeys::new(i, options)).collect();
    let right_keys: Vec<MatchKeys<'_>> = pair_list.iter().map(|i| MatchKeys::new(i, options)).collect();
    let mut right_used = vec![false; right_keys.len()];
    let mut decisions = Vec::new();

    for (li, left) in left_keys.iter().enumerate() {
        let used = &right_used;
        let open = || (0..right_keys.len()).filter(move |&ri| !used[ri]);

        let found = open()
            .find(|&ri| left.identical(&right_keys[ri]))
            .map(|ri| (ri, PairState::Identical))
            .or_else(|| {
                open()
                    .find(|&ri| MatchEvidence::from_keys(left, &right_keys[ri]).similar_at(level))
                    .map(|ri| (ri, PairState::Similar))
            });

        match found {
            Some((ri, state)) => {
                log::debug!(
                    "record {li} ({}) paired with {ri} ({}): {state}",
                    list[li].visible_name,
                    pair_list[ri].visible_name,
                );
                right_used[ri] = true;
                decisions.push((li, ri, state));
            }
            None => log::debug!("record {li} ({}) has no pair", list[li].visible_name),
        }
    }
    decisions
}

/// Pairing outcome of every record in `list`, in list order.
pub fn pair_entries(list: &ContactList) -> Vec<PairEntry> {
    list.iter()
        .enumerate()
        .map(|(index, item)| PairEntry {
            index,
            visible_name: item.visible_name.clone(),
            state: item.pair_state,
            pair_index: item.pair_index(),
        })
        .collect()
}
