//! Name decomposition and display helpers
//!
//! A structured name is a positional sequence of up to [`MAX_NAMES`] slots:
//! prefix, given, middle, family, suffix. Any slot may be empty. Helpers here
//! are pure and never reorder slots except where the function says so.

/// Honorific prefix ("Dr", "Mrs")
pub const PREFIX: usize = 0;
/// Given (first) name
pub const GIVEN: usize = 1;
/// Middle name(s), space separated when there are several
pub const MIDDLE: usize = 2;
/// Family (last) name
pub const FAMILY: usize = 3;
/// Generational or academic suffix ("Jr", "PhD")
pub const SUFFIX: usize = 4;

pub const MAX_NAMES: usize = 5;

const HONORIFICS: &[&str] = &["mr", "mrs", "ms", "miss", "dr", "prof", "sir"];
const SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv", "phd", "md", "esq"];

fn is_one_of(token: &str, table: &[&str]) -> bool {
    let bare = token.trim_end_matches('.').to_lowercase();
    table.contains(&bare.as_str())
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decompose a display name into the 5-slot positional sequence.
///
/// Always returns [`MAX_NAMES`] slots. Handles the `Family, Given Middle`
/// comma form, a leading honorific and a trailing suffix; otherwise the
/// first token is the given name, the last one the family name and
/// everything in between is the middle name.
pub fn split_full_name(full: &str) -> Vec<String> {
    let mut slots = vec![String::new(); MAX_NAMES];

    if let Some((family, rest)) = full.split_once(',') {
        let family = collapse_whitespace(family);
        let rest: Vec<&str> = rest.split_whitespace().collect();
        if !family.is_empty() && !rest.is_empty() {
            slots[FAMILY] = family;
            slots[GIVEN] = rest[0].to_string();
            slots[MIDDLE] = rest[1..].join(" ");
            return slots;
        }
    }

    let mut tokens: Vec<&str> = full.split_whitespace().collect();
    if tokens.is_empty() {
        return slots;
    }

    if is_one_of(tokens[0], HONORIFICS) {
        slots[PREFIX] = tokens.remove(0).to_string();
    }
    if tokens.len() > 1 && tokens.last().is_some_and(|t| is_one_of(t, SUFFIXES)) {
        if let Some(suffix) = tokens.pop() {
            slots[SUFFIX] = suffix.to_string();
        }
    }

    match tokens.len() {
        0 => {}
        1 => slots[GIVEN] = tokens[0].to_string(),
        n => {
            slots[GIVEN] = tokens[0].to_string();
            slots[FAMILY] = tokens[n - 1].to_string();
            slots[MIDDLE] = tokens[1..n - 1].join(" ");
        }
    }
    slots
}

/// Join name slots into a display string, skipping empty slots.
pub fn join_names(names: &[String]) -> String {
    names
        .iter()
        .map(|n| collapse_whitespace(n))
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Swap given and family names. Other slots stay where they are.
///
/// Short sequences are padded to [`MAX_NAMES`] first so both slots exist.
/// Returns false (and leaves `names` untouched) when there is nothing to swap.
pub fn swap_given_family(names: &mut Vec<String>) -> bool {
    if names.is_empty() {
        return false;
    }
    if names.len() < MAX_NAMES {
        names.resize(MAX_NAMES, String::new());
    }
    names.swap(GIVEN, FAMILY);
    true
}

/// Remove empty slots from the end of the sequence.
///
/// Interior empties (missing middle name, say) are kept so positions keep
/// their meaning.
pub fn drop_final_empty_names(names: &mut Vec<String>) {
    while names.last().is_some_and(|n| n.trim().is_empty()) {
        names.pop();
    }
}

/// Pad (or cut) a name sequence to exactly [`MAX_NAMES`] slots.
pub fn padded(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = names.iter().take(MAX_NAMES).map(|n| collapse_whitespace(n)).collect();
    out.resize(MAX_NAMES, String::new());
    out
}

/// Move the last word of a display name to the front.
///
/// "John Smith" becomes "Smith John". Single words come back unchanged.
pub fn reverse_full_name(full: &str) -> String {
    let mut tokens: Vec<&str> = full.split_whitespace().collect();
    if tokens.len() < 2 {
        return collapse_whitespace(full);
    }
    if let Some(last) = tokens.pop() {
        tokens.insert(0, last);
    }
    tokens.join(" ")
}
