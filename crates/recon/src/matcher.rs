//! Identity and similarity predicates between two records.
//!
//! Records are reduced once to [`MatchKeys`] (normalized names, phones and
//! emails); pairs of keys yield [`MatchEvidence`], and the strictness level
//! decides which evidence is enough.

use twincard_engine::names::{self, collapse_whitespace};
use twincard_engine::phone::{expand_number, normalize_for_match};
use twincard_engine::ContactItem;

use crate::config::{CompareOptions, MAX_COMPARE_PRIORITY_LEVEL};

/// Shortest digit run that counts for a trailing-digits phone match
const MIN_SUFFIX_DIGITS: usize = 7;

/// Normalized view of one record, built once per comparison run.
#[derive(Debug, Clone)]
pub(crate) struct MatchKeys<'a> {
    item: &'a ContactItem,
    /// Distinct display forms: full name and joined structured names
    names: Vec<String>,
    names_lower: Vec<String>,
    /// Lowercase tokens, sorted, one list per display form
    name_tokens: Vec<Vec<String>>,
    /// Canonical phones, sorted and deduplicated
    phones: Vec<String>,
    /// Lowercase emails, sorted and deduplicated
    emails: Vec<String>,
}

impl<'a> MatchKeys<'a> {
    pub(crate) fn new(item: &'a ContactItem, options: &CompareOptions) -> Self {
        let mut names = Vec::new();
        for candidate in [collapse_whitespace(&item.full_name), item.format_names()] {
            if !candidate.is_empty() && !names.contains(&candidate) {
                names.push(candidate);
            }
        }
        let names_lower: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
        let name_tokens = names_lower
            .iter()
            .map(|n| {
                let mut tokens: Vec<String> = n.split_whitespace().map(str::to_string).collect();
                tokens.sort();
                tokens
            })
            .collect();

        let mut phones: Vec<String> = item
            .phones
            .iter()
            .filter_map(|p| {
                let value = match options.country_rule {
                    Some(rule) => expand_number(&p.value, rule),
                    None => p.value.clone(),
                };
                normalize_for_match(&value)
            })
            .collect();
        phones.sort();
        phones.dedup();

        let mut emails: Vec<String> = item
            .emails
            .iter()
            .map(|e| e.value.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        emails.sort();
        emails.dedup();

        Self {
            item,
            names,
            names_lower,
            name_tokens,
            phones,
            emails,
        }
    }

    fn has_comparable_data(&self) -> bool {
        !self.names.is_empty() || !self.phones.is_empty() || !self.emails.is_empty()
    }

    /// Exact match on every populated comparable field.
    pub(crate) fn identical(&self, other: &MatchKeys<'_>) -> bool {
        let (a, b) = (self.item, other.item);
        if !self.has_comparable_data() || !other.has_comparable_data() {
            return false;
        }

        let names_equal = if a.has_names() && b.has_names() {
            names::padded(&a.names) == names::padded(&b.names)
        } else {
            a.make_generic_name() == b.make_generic_name()
        };
        let full_a = collapse_whitespace(&a.full_name);
        let full_b = collapse_whitespace(&b.full_name);
        let full_names_equal = full_a.is_empty() || full_b.is_empty() || full_a == full_b;

        names_equal
            && full_names_equal
            && self.phones == other.phones
            && self.emails == other.emails
            && a.birthday == b.birthday
    }
}

fn digits_only(phone: &str) -> &str {
    phone.trim_start_matches('+')
}

fn phones_loosely_equal(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    let (a, b) = (digits_only(a), digits_only(b));
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    short.len() >= MIN_SUFFIX_DIGITS && long.ends_with(short)
}

fn any_pair(x: &[String], y: &[String], eq: impl Fn(&str, &str) -> bool) -> bool {
    x.iter().any(|p| y.iter().any(|q| eq(p.as_str(), q.as_str())))
}

/// What two records have in common.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchEvidence {
    /// A display name matches exactly (whitespace collapsed)
    pub name_exact: bool,
    /// A display name matches ignoring case
    pub name_ci: bool,
    /// A display name has the same words in any order, ignoring case
    pub name_tokens: bool,
    /// Some phone has the same canonical form
    pub phone_strict: bool,
    /// Some phone shares at least 7 trailing digits
    pub phone_loose: bool,
    /// Some email matches ignoring case
    pub email: bool,
    /// Both have birthdays and they fall on different days
    pub birthday_conflict: bool,
}

impl MatchEvidence {
    pub fn between(a: &ContactItem, b: &ContactItem, options: &CompareOptions) -> Self {
        Self::from_keys(&MatchKeys::new(a, options), &MatchKeys::new(b, options))
    }

    pub(crate) fn from_keys(a: &MatchKeys<'_>, b: &MatchKeys<'_>) -> Self {
        let birthday_conflict = match (a.item.birthday.date(), b.item.birthday.date()) {
            (Some(x), Some(y)) => x != y,
            _ => false,
        };

        Self {
            name_exact: any_pair(&a.names, &b.names, |x, y| x == y),
            name_ci: any_pair(&a.names_lower, &b.names_lower, |x, y| x == y),
            name_tokens: a.name_tokens.iter().any(|t| b.name_tokens.contains(t)),
            phone_strict: any_pair(&a.phones, &b.phones, |x, y| x == y),
            phone_loose: any_pair(&a.phones, &b.phones, phones_loosely_equal),
            email: any_pair(&a.emails, &b.emails, |x, y| x == y),
            birthday_conflict,
        }
    }

    /// The extra requirement a single level adds on top of the looser ones.
    fn level_rule(&self, level: u8) -> bool {
        match level {
            1 => self.name_tokens || self.phone_loose || self.email,
            2 => self.name_ci || self.phone_strict || self.email,
            3 => (self.name_ci && !self.birthday_conflict) || (self.phone_strict && self.email),
            4 => self.name_ci && (self.phone_loose || self.email) && !self.birthday_conflict,
            _ => self.name_exact && (self.phone_strict || self.email),
        }
    }

    /// Similar at `level`: every rule from level 1 up to `level` holds.
    pub fn similar_at(&self, level: u8) -> bool {
        let level = level.clamp(1, MAX_COMPARE_PRIORITY_LEVEL);
        (1..=level).all(|l| self.level_rule(l))
    }
}

/// All populated comparable fields agree: names (or full name), phones and
/// emails as unordered sets of normalized values, birthday with its
/// date-only/with-time flags.
///
/// Records with no name, phone or email at all are never identical.
pub fn identical_to(a: &ContactItem, b: &ContactItem, options: &CompareOptions) -> bool {
    MatchKeys::new(a, options).identical(&MatchKeys::new(b, options))
}

/// Similarity at strictness `level` (1 loosest, 5 strictest).
///
/// Monotonic: similar at level N implies similar at every level below N.
pub fn similar_to(a: &ContactItem, b: &ContactItem, level: u8, options: &CompareOptions) -> bool {
    MatchEvidence::between(a, b, options).similar_at(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use twincard_engine::{DateFormat, DateItem, Email, FormatOptions, Phone};

    fn contact(given: &str, family: &str, phones: &[&str], emails: &[&str]) -> ContactItem {
        let mut item = ContactItem {
            names: vec!["".into(), given.into(), "".into(), family.into(), "".into()],
            phones: phones.iter().map(|p| Phone::new(*p, &[])).collect(),
            emails: emails.iter().map(|e| Email::new(*e, &[])).collect(),
            ..ContactItem::default()
        };
        item.calculate_fields();
        item
    }

    fn opts() -> CompareOptions {
        CompareOptions::default()
    }

    #[test]
    fn identical_ignores_phone_order_and_formatting() {
        let a = contact("John", "Smith", &["+1-555-0100", "555 0199"], &[]);
        let b = contact("John", "Smith", &["5550199", "+1 555 0100"], &[]);
        assert!(identical_to(&a, &b, &opts()));
    }

    #[test]
    fn identical_fails_on_extra_email() {
        let a = contact("John", "Smith", &["+1-555-0100"], &[]);
        let b = contact("John", "Smith", &["+1-555-0100"], &["js@example.org"]);
        assert!(!identical_to(&a, &b, &opts()));
    }

    #[test]
    fn identical_respects_birthday_time_flag() {
        let fo = FormatOptions::default();
        let mut a = contact("John", "Smith", &[], &[]);
        let mut b = a.clone();
        a.birthday = DateItem::parse("1980-01-15", DateFormat::IsoExtended, &fo);
        b.birthday = DateItem::parse("1980-01-15T00:00:00", DateFormat::IsoExtended, &fo);
        assert!(!identical_to(&a, &b, &opts()));
        b.birthday = a.birthday.clone();
        assert!(identical_to(&a, &b, &opts()));
    }

    #[test]
    fn full_name_matches_structured_names() {
        let a = ContactItem {
            full_name: "John Smith".into(),
            ..ContactItem::default()
        };
        let b = contact("John", "Smith", &[], &[]);
        assert!(identical_to(&a, &b, &opts()));
    }

    #[test]
    fn empty_records_are_not_identical() {
        assert!(!identical_to(&ContactItem::default(), &ContactItem::default(), &opts()));
    }

    #[test]
    fn country_rule_makes_national_and_international_equal() {
        let a = contact("Ivan", "Petrov", &["8 (916) 123-45-67"], &[]);
        let b = contact("Ivan", "Petrov", &["+7 916 123 45 67"], &[]);
        assert!(!identical_to(&a, &b, &opts()));
        let with_rule = CompareOptions { country_rule: Some(0), ..opts() };
        assert!(identical_to(&a, &b, &with_rule));
    }

    #[test]
    fn same_name_different_phone_is_similar_only_when_loose() {
        let a = contact("John", "Smith", &["+1-555-0100"], &[]);
        let b = contact("John", "Smith", &["+1-555-0177"], &[]);
        assert!(similar_to(&a, &b, 1, &opts()));
        assert!(similar_to(&a, &b, 3, &opts()));
        assert!(!similar_to(&a, &b, 4, &opts()));
        assert!(!similar_to(&a, &b, 5, &opts()));
    }

    #[test]
    fn reversed_name_only_similar_at_level_one() {
        let a = ContactItem { full_name: "Smith John".into(), ..ContactItem::default() };
        let b = ContactItem { full_name: "john smith".into(), ..ContactItem::default() };
        assert!(similar_to(&a, &b, 1, &opts()));
        assert!(!similar_to(&a, &b, 2, &opts()));
    }

    #[test]
    fn shared_email_with_exact_name_passes_level_five() {
        let a = contact("Ann", "Lee", &[], &["Ann@Example.org"]);
        let b = contact("Ann", "Lee", &["123"], &["ann@example.org"]);
        assert!(similar_to(&a, &b, 5, &opts()));
    }

    #[test]
    fn trailing_digits_match_is_loose_only() {
        let a = contact("A", "B", &["+7 916 123 45 67"], &[]);
        let b = contact("X", "Y", &["916 123 45 67"], &[]);
        let ev = MatchEvidence::between(&a, &b, &opts());
        assert!(ev.phone_loose);
        assert!(!ev.phone_strict);
        assert!(similar_to(&a, &b, 1, &opts()));
        assert!(!similar_to(&a, &b, 2, &opts()));
    }

    #[test]
    fn short_numbers_need_exact_match() {
        assert!(phones_loosely_equal("112", "112"));
        assert!(!phones_loosely_equal("0112", "112"));
    }

    #[test]
    fn birthday_conflict_blocks_level_four() {
        let fo = FormatOptions::default();
        let mut a = contact("Ann", "Lee", &["555 0100"], &["ann@example.org"]);
        let mut b = contact("Ann", "Lee", &["555 0100"], &["ann@example.org"]);
        a.birthday = DateItem::parse("19800115", DateFormat::IsoBasic, &fo);
        b.birthday = DateItem::parse("19810115", DateFormat::IsoBasic, &fo);
        let ev = MatchEvidence::between(&a, &b, &opts());
        assert!(ev.birthday_conflict);
        assert!(similar_to(&a, &b, 3, &opts()));
        assert!(!similar_to(&a, &b, 4, &opts()));
    }

    #[test]
    fn nothing_in_common_is_never_similar() {
        let a = contact("John", "Smith", &["111 1111"], &["j@x.org"]);
        let b = contact("Mary", "Jones", &["222 2222"], &["m@y.org"]);
        for level in 1..=MAX_COMPARE_PRIORITY_LEVEL {
            assert!(!similar_to(&a, &b, level, &opts()));
        }
    }
}
