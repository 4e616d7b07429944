use proptest::prelude::*;
use twincard_engine::{ContactItem, ContactList, Email, PairState, Phone};
use twincard_recon::{compare_with, identical_to, similar_to, CompareOptions, MatchEvidence};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

// Small pools so that collisions (and therefore matches) are common.
fn arb_record() -> impl Strategy<Value = ContactItem> {
    (
        prop::sample::select(vec!["John", "john", "Mary", "Ann", ""]),
        prop::sample::select(vec!["Smith", "SMITH", "Lee", ""]),
        prop::collection::vec(prop::sample::select(vec!["555 0100", "+1 555 0100", "0199", "84951234567"]), 0..3),
        prop::collection::vec(prop::sample::select(vec!["a@x.org", "A@X.org", "b@y.net"]), 0..2),
    )
        .prop_map(|(given, family, phones, emails)| {
            let mut item = ContactItem {
                names: vec![String::new(), given.into(), String::new(), family.into(), String::new()],
                phones: phones.into_iter().map(|p| Phone::new(p, &[])).collect(),
                emails: emails.into_iter().map(|e| Email::new(e, &[])).collect(),
                ..ContactItem::default()
            };
            item.calculate_fields();
            item
        })
}

fn arb_list() -> impl Strategy<Value = ContactList> {
    prop::collection::vec(arb_record(), 0..8).prop_map(|items| items.into_iter().collect())
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn pairing_is_symmetric(mut a in arb_list(), mut b in arb_list(), level in 1u8..=5) {
        compare_with(&mut a, &mut b, &CompareOptions::with_level(level));

        for (index, item) in a.iter().enumerate() {
            match item.pair {
                Some(pair) => {
                    prop_assert_eq!(pair.list, b.id());
                    let other = &b[pair.index];
                    prop_assert_eq!(other.pair.map(|p| (p.list, p.index)), Some((a.id(), index)));
                    prop_assert_eq!(other.pair_state, item.pair_state);
                    prop_assert_ne!(item.pair_state, PairState::NotFound);
                }
                None => prop_assert_eq!(item.pair_state, PairState::NotFound),
            }
        }
        let paired_b = b.iter().filter(|i| i.pair.is_some()).count();
        let paired_a = a.iter().filter(|i| i.pair.is_some()).count();
        prop_assert_eq!(paired_a, paired_b);
    }

    #[test]
    fn similarity_is_monotonic(x in arb_record(), y in arb_record()) {
        let options = CompareOptions::default();
        let evidence = MatchEvidence::between(&x, &y, &options);
        for level in 2..=5u8 {
            if evidence.similar_at(level) {
                prop_assert!(evidence.similar_at(level - 1));
            }
        }
        if similar_to(&x, &y, 5, &options) {
            prop_assert!(similar_to(&x, &y, 1, &options));
        }
    }

    #[test]
    fn predicates_are_symmetric(x in arb_record(), y in arb_record(), level in 1u8..=5) {
        let options = CompareOptions::default();
        prop_assert_eq!(identical_to(&x, &y, &options), identical_to(&y, &x, &options));
        prop_assert_eq!(similar_to(&x, &y, level, &options), similar_to(&y, &x, level, &options));
    }

    #[test]
    fn identity_is_recorded_as_identical(x in arb_record(), level in 1u8..=5) {
        let options = CompareOptions::with_level(level);
        let mut a: ContactList = std::iter::once(x.clone()).collect();
        let mut b: ContactList = std::iter::once(x.clone()).collect();
        compare_with(&mut a, &mut b, &options);
        if identical_to(&x, &x, &options) {
            prop_assert_eq!(a[0].pair_state, PairState::Identical);
        } else {
            prop_assert_eq!(a[0].pair_state, PairState::NotFound);
        }
    }
}
