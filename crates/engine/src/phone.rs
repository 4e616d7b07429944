//! Phone number canonicalization
//!
//! National numbers are rewritten into international form using a small
//! table of country dialing conventions. Numbers that do not fit the chosen
//! rule, and numbers that are already international, come back untouched.

/// National dialing convention for one country.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryRule {
    pub name: &'static str,
    /// Digits dialed before the subscriber number inside the country
    pub trunk_prefix: &'static str,
    /// Subscriber number length after the trunk prefix
    pub subscriber_digits: usize,
    /// Country calling code without the leading '+'
    pub country_code: &'static str,
}

pub const COUNTRY_RULES: &[CountryRule] = &[
    CountryRule { name: "Russia", trunk_prefix: "8", subscriber_digits: 10, country_code: "7" },
    CountryRule { name: "Ukraine", trunk_prefix: "0", subscriber_digits: 9, country_code: "380" },
    CountryRule { name: "Belarus", trunk_prefix: "80", subscriber_digits: 9, country_code: "375" },
];

/// Display names of the known rules, in rule-index order.
pub fn available_country_rules() -> Vec<String> {
    COUNTRY_RULES
        .iter()
        .map(|r| format!("{} (+{})", r.name, r.country_code))
        .collect()
}

/// Rewrite a national number into international form under `rule_index`.
///
/// Formatting characters are dropped from rewritten numbers. A number that
/// already starts with '+', an unknown rule index, or a number whose digits
/// do not match the rule's trunk prefix and length is returned unchanged.
pub fn expand_number(number: &str, rule_index: usize) -> String {
    let Some(rule) = COUNTRY_RULES.get(rule_index) else {
        return number.to_string();
    };
    let trimmed = number.trim();
    if trimmed.starts_with('+') {
        return number.to_string();
    }

    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == rule.trunk_prefix.len() + rule.subscriber_digits
        && digits.starts_with(rule.trunk_prefix)
    {
        format!("+{}{}", rule.country_code, &digits[rule.trunk_prefix.len()..])
    } else {
        number.to_string()
    }
}

/// Reduce a phone string to a comparable key: digits, with a leading '+'
/// kept when present.
///
/// Anything after an extension marker (`x`, `#`, `;`, `,`) is ignored.
/// Returns `None` when the value has no digits before the extension.
pub fn normalize_for_match(value: &str) -> Option<String> {
    let trimmed = value.trim();
    let mut out = String::new();
    let mut saw_digit = false;

    if trimmed.starts_with('+') {
        out.push('+');
    }

    for ch in trimmed.chars() {
        if ch.is_ascii_digit() {
            out.push(ch);
            saw_digit = true;
        } else if matches!(ch, 'x' | 'X' | '#' | ';' | ',') {
            break;
        }
    }

    saw_digit.then_some(out)
}
