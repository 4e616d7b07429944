//! CSV column layouts.
//!
//! A profile maps one vendor's column set to [`ContactItem`] fields. The
//! codec picks a profile from the header row, checks the row length against
//! [`CsvProfile::min_fields`], and hands every row over to the profile.

use csv::StringRecord;
use twincard_engine::names::{GIVEN, MAX_NAMES};
use twincard_engine::{ContactItem, DateFormat, DateItem, Email, FormatOptions, Phone};

use crate::format::{FormatError, ImportReport};

pub trait CsvProfile {
    fn name(&self) -> &'static str;

    /// Whether a header row belongs to this profile.
    fn detect(&self, header: &StringRecord) -> bool;

    fn has_header(&self) -> bool {
        true
    }

    /// Rows with fewer fields are rejected before `import_record` runs.
    fn min_fields(&self) -> usize;

    /// Header written on export.
    fn columns(&self) -> &'static [&'static str];

    /// Fill `item` from `row`. Unsupported or odd values go to `report`.
    fn import_record(
        &self,
        row: &StringRecord,
        item: &mut ContactItem,
        options: &FormatOptions,
        report: &mut ImportReport,
    );

    fn can_export(&self) -> bool {
        false
    }

    fn export_record(&self, item: &ContactItem, options: &FormatOptions) -> Result<Vec<String>, FormatError> {
        let _ = (item, options);
        Err(FormatError::ReadOnly(self.name()))
    }

    /// Populated fields of `item` that `export_record` cannot store.
    fn dropped_fields(&self, item: &ContactItem) -> Vec<&'static str> {
        let _ = item;
        Vec::new()
    }
}

fn field<'r>(row: &'r StringRecord, index: usize) -> &'r str {
    row.get(index).map(str::trim).unwrap_or("")
}

fn header_is(header: &StringRecord, expected: &[&str]) -> bool {
    expected
        .iter()
        .enumerate()
        .all(|(i, name)| header.get(i).map(str::trim) == Some(*name))
}

fn push_phone(item: &mut ContactItem, value: &str, types: &[&str]) {
    if !value.is_empty() {
        item.phones.push(Phone::new(value, types));
    }
}

// ---------------------------------------------------------------------------
// Explay
// ---------------------------------------------------------------------------

const EXPLAY_COLUMNS: &[&str] = &[
    "Title",
    "First name",
    "Middle name",
    "Last name",
    "Suffix",
    "Job title",
    "Company",
    "Birthday",
    "SIP address",
    "Push-to-talk",
    "Share view",
    "User ID",
    "Mobile phone",
    "Home phone",
    "Fax",
    "Video call",
    "Web page",
];

/// Columns the device writes but whose content is not understood yet.
const EXPLAY_UNSUPPORTED: &[usize] = &[8, 9, 10];

/// Contact export of Explay feature phones. Import only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplayProfile;

impl CsvProfile for ExplayProfile {
    fn name(&self) -> &'static str {
        "Explay CSV"
    }

    fn detect(&self, header: &StringRecord) -> bool {
        header_is(header, &EXPLAY_COLUMNS[..3])
    }

    fn min_fields(&self) -> usize {
        13
    }

    fn columns(&self) -> &'static [&'static str] {
        EXPLAY_COLUMNS
    }

    fn import_record(
        &self,
        row: &StringRecord,
        item: &mut ContactItem,
        options: &FormatOptions,
        report: &mut ImportReport,
    ) {
        item.full_name = field(row, 0).to_string();
        item.names = vec![
            String::new(),
            field(row, 1).to_string(),
            field(row, 2).to_string(),
            field(row, 3).to_string(),
            field(row, 4).to_string(),
        ];
        item.drop_final_empty_names();
        item.title = field(row, 5).to_string();
        item.organization = field(row, 6).to_string();

        let birthday = field(row, 7);
        if !birthday.is_empty() {
            item.birthday = DateItem::parse(birthday, DateFormat::Local, options);
            if item.birthday.is_empty() {
                item.birthday = DateItem::parse(birthday, DateFormat::IsoExtended, options);
            }
            if item.birthday.is_empty() {
                report.warn(format!(
                    "Unrecognized birthday format ({birthday}) for {}",
                    item.full_name
                ));
            }
        }

        for &index in EXPLAY_UNSUPPORTED {
            let value = field(row, index);
            if !value.is_empty() {
                report.warn(format!(
                    "Column {index} ({}) is not supported, value ignored: {value}",
                    EXPLAY_COLUMNS[index]
                ));
            }
        }

        item.id = field(row, 11).to_string();
        push_phone(item, field(row, 12), &["cell", "pref"]);
        push_phone(item, field(row, 13), &["home"]);
        push_phone(item, field(row, 14), &["fax"]);
        push_phone(item, field(row, 15), &["video"]);
        item.url = field(row, 16).to_string();
    }
}

// ---------------------------------------------------------------------------
// Generic
// ---------------------------------------------------------------------------

const GENERIC_COLUMNS: &[&str] = &[
    "Full name",
    "Prefix",
    "Given name",
    "Middle name",
    "Family name",
    "Suffix",
    "Nickname",
    "Phones",
    "Emails",
    "Birthday",
    "Organization",
    "Title",
    "URL",
    "Notes",
    "ID",
];

/// Separator between entries of a multi-value cell
const ENTRY_SEPARATOR: &str = "; ";

/// Portable column set that round-trips names, phones, emails and the
/// common scalar fields.
///
/// Multi-value cells hold entries separated by `"; "`, each written as
/// `value` or `value (type,type)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericProfile;

/// Split `value (type,type)`. A trailing group that holds anything but
/// alphabetic tags, as in `555 (0100)`, belongs to the value.
fn split_typed(entry: &str) -> (&str, Vec<&str>) {
    let entry = entry.trim();
    if let Some(open) = entry.rfind(" (") {
        if let Some(inner) = entry[open + 2..].strip_suffix(')') {
            let types: Vec<&str> = inner.split(',').map(str::trim).collect();
            let all_tags = types
                .iter()
                .all(|t| !t.is_empty() && t.chars().all(|c| c.is_ascii_alphabetic() || c == '-'));
            if all_tags {
                return (entry[..open].trim_end(), types);
            }
        }
    }
    (entry, Vec::new())
}

fn join_typed<'a>(entries: impl Iterator<Item = (&'a str, &'a [String])>) -> String {
    entries
        .map(|(value, types)| {
            if types.is_empty() {
                value.to_string()
            } else {
                format!("{value} ({})", types.join(","))
            }
        })
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

impl CsvProfile for GenericProfile {
    fn name(&self) -> &'static str {
        "Generic CSV"
    }

    fn detect(&self, header: &StringRecord) -> bool {
        header_is(header, &GENERIC_COLUMNS[..3])
    }

    fn min_fields(&self) -> usize {
        GENERIC_COLUMNS.len()
    }

    fn columns(&self) -> &'static [&'static str] {
        GENERIC_COLUMNS
    }

    fn import_record(
        &self,
        row: &StringRecord,
        item: &mut ContactItem,
        options: &FormatOptions,
        report: &mut ImportReport,
    ) {
        item.full_name = field(row, 0).to_string();
        item.names = (1..=MAX_NAMES).map(|i| field(row, i).to_string()).collect();
        item.drop_final_empty_names();
        item.nick_name = field(row, 6).to_string();

        for entry in field(row, 7).split(';').filter(|e| !e.trim().is_empty()) {
            let (value, types) = split_typed(entry);
            item.phones.push(Phone::new(value, &types));
        }
        for entry in field(row, 8).split(';').filter(|e| !e.trim().is_empty()) {
            let (value, types) = split_typed(entry);
            item.emails.push(Email::new(value, &types));
        }

        let birthday = field(row, 9);
        if !birthday.is_empty() {
            item.birthday = DateItem::parse(birthday, DateFormat::IsoExtended, options);
            if item.birthday.is_empty() {
                report.warn(format!(
                    "Unrecognized birthday format ({birthday}) for {}",
                    item.make_generic_name()
                ));
            }
        }

        item.organization = field(row, 10).to_string();
        item.title = field(row, 11).to_string();
        item.url = field(row, 12).to_string();
        item.description = field(row, 13).to_string();
        item.id = field(row, 14).to_string();
    }

    fn can_export(&self) -> bool {
        true
    }

    fn export_record(&self, item: &ContactItem, options: &FormatOptions) -> Result<Vec<String>, FormatError> {
        let mut row = Vec::with_capacity(GENERIC_COLUMNS.len());
        row.push(item.full_name.clone());
        row.extend((0..MAX_NAMES).map(|slot| item.name(slot).to_string()));
        row.push(item.nick_name.clone());
        row.push(join_typed(item.phones.iter().map(|p| (p.value.as_str(), p.types.as_slice()))));
        row.push(join_typed(item.emails.iter().map(|e| (e.value.as_str(), e.types.as_slice()))));
        row.push(item.birthday.to_string(DateFormat::IsoExtended, options));
        row.push(item.organization.clone());
        row.push(item.title.clone());
        row.push(item.url.clone());
        row.push(item.description.clone());
        row.push(item.id.clone());
        debug_assert_eq!(row.len(), GENERIC_COLUMNS.len());
        Ok(row)
    }

    fn dropped_fields(&self, item: &ContactItem) -> Vec<&'static str> {
        let mut dropped = Vec::new();
        if !item.addr_home.is_empty() || !item.addr_work.is_empty() {
            dropped.push("postal addresses");
        }
        if !item.anniversaries.is_empty() {
            dropped.push("anniversaries");
        }
        if !item.photo.is_empty() {
            dropped.push("photos");
        }
        if !item.jabber_name.is_empty() || !item.icq_name.is_empty() || !item.skype_name.is_empty() {
            dropped.push("messenger names");
        }
        if !item.other_tags.is_empty() || !item.unknown_tags.is_empty() {
            dropped.push("extra tags");
        }
        dropped
    }
}

/// Built-in profiles in detection order.
pub fn builtin_profiles() -> Vec<Box<dyn CsvProfile>> {
    vec![Box::new(ExplayProfile), Box::new(GenericProfile)]
}
