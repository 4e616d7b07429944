//! Contact record model
//!
//! [`ContactItem`] is the canonical in-memory form of one address-book entry.
//! Codecs fill the source fields and then call
//! [`ContactItem::calculate_fields`]; the matching engine writes only the
//! pairing fields.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::date::DateItem;
use crate::list::ListId;
use crate::names::{self, FAMILY, GIVEN, MIDDLE};
use crate::options::FormatOptions;
use crate::phone;

/// According to vCard 4.0 a contact can carry only one anniversary
pub const MAX_ANN: usize = 1;

// ---------------------------------------------------------------------------
// Typed values (phones, emails)
// ---------------------------------------------------------------------------

/// Marker for the kind of a [`TypedValue`]; supplies the standard type table.
pub trait ValueKind: fmt::Debug + Clone + Default + PartialEq {
    const NAME: &'static str;
    const STANDARD_TYPES: &'static [&'static str];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhoneKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmailKind;

impl ValueKind for PhoneKind {
    const NAME: &'static str = "phone";
    const STANDARD_TYPES: &'static [&'static str] = &[
        "home", "work", "cell", "pref", "voice", "fax", "msg", "video", "pager", "bbs", "modem",
        "car", "isdn", "pcs",
    ];
}

impl ValueKind for EmailKind {
    const NAME: &'static str = "email";
    const STANDARD_TYPES: &'static [&'static str] = &["internet", "x400", "pref", "home", "work"];
}

/// A value plus an ordered set of type tags (home, work, pref, ...).
///
/// Tags are not mutually exclusive. An empty tag list means untyped.
#[derive(Debug, Clone, Default)]
pub struct TypedValue<K: ValueKind> {
    pub value: String,
    pub types: Vec<String>,
    /// External sync reference some devices attach to an entry
    pub sync_ml_ref: Option<i32>,
    kind: PhantomData<K>,
}

pub type Phone = TypedValue<PhoneKind>;
pub type Email = TypedValue<EmailKind>;

impl<K: ValueKind> TypedValue<K> {
    pub fn new(value: impl Into<String>, types: &[&str]) -> Self {
        Self {
            value: value.into(),
            types: types
                .iter()
                .filter(|t| !t.is_empty())
                .map(|t| t.to_string())
                .collect(),
            sync_ml_ref: None,
            kind: PhantomData,
        }
    }

    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn is_standard_type(tag: &str) -> bool {
        K::STANDARD_TYPES.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Tags not present in the kind's standard table.
    pub fn non_standard_types(&self) -> Vec<&str> {
        self.types
            .iter()
            .filter(|t| !Self::is_standard_type(t))
            .map(String::as_str)
            .collect()
    }

    pub fn kind_name(&self) -> &'static str {
        K::NAME
    }
}

impl<K: ValueKind> PartialEq for TypedValue<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.types == other.types
    }
}

impl Phone {
    /// International form of this number under `rule_index`.
    pub fn expand_number(&self, rule_index: usize) -> String {
        phone::expand_number(&self.value, rule_index)
    }

    /// International form under the configured default rule.
    pub fn expand_default(&self, options: &FormatOptions) -> String {
        self.expand_number(options.default_country_rule)
    }
}

// ---------------------------------------------------------------------------
// Postal address, photo, tags
// ---------------------------------------------------------------------------

pub const ADDRESS_STANDARD_TYPES: &[&str] = &["dom", "intl", "postal", "parcel", "home", "work", "pref"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostalAddress {
    pub po_box: String,
    pub extended: String,
    pub street: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
    pub types: Vec<String>,
}

impl PostalAddress {
    fn parts(&self) -> [&str; 7] {
        [
            &self.po_box,
            &self.extended,
            &self.street,
            &self.city,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
    }

    fn parts_mut(&mut self) -> [&mut String; 7] {
        [
            &mut self.po_box,
            &mut self.extended,
            &mut self.street,
            &mut self.city,
            &mut self.region,
            &mut self.postal_code,
            &mut self.country,
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.parts().iter().all(|p| p.trim().is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for PostalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self.parts().into_iter().filter(|p| !p.trim().is_empty()).collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoKind {
    #[default]
    Unknown,
    Url,
    Jpeg,
    Png,
}

/// Contact image: inline bytes or a link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Photo {
    pub kind: PhotoKind,
    pub data: Vec<u8>,
    pub url: String,
}

impl Photo {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.url.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Pixel format from the magic bytes, or `Url` for linked images.
    pub fn detect_format(&self) -> PhotoKind {
        if !self.url.is_empty() {
            PhotoKind::Url
        } else if self.data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            PhotoKind::Jpeg
        } else if self.data.starts_with(&[0x89, b'P', b'N', b'G']) {
            PhotoKind::Png
        } else {
            PhotoKind::Unknown
        }
    }
}

/// Key/value pair kept verbatim for round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValue {
    pub tag: String,
    pub value: String,
}

impl TagValue {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self { tag: tag.into(), value: value.into() }
    }
}

// ---------------------------------------------------------------------------
// Pairing annotation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairState {
    #[default]
    NotFound,
    Similar,
    Identical,
}

impl fmt::Display for PairState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Similar => write!(f, "similar"),
            Self::Identical => write!(f, "identical"),
        }
    }
}

/// Non-owning handle to the paired record in another list.
///
/// Only meaningful while that list is alive and unchanged; resolve it with
/// [`crate::list::ContactList::pair_of`], which checks the list identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PairRef {
    pub list: ListId,
    pub index: usize,
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ContactItem {
    pub full_name: String,
    /// Up to 5 positional slots, see [`crate::names`]
    pub names: Vec<String>,
    pub phones: Vec<Phone>,
    pub emails: Vec<Email>,
    pub birthday: DateItem,
    /// At most [`MAX_ANN`] entries
    pub anniversaries: Vec<DateItem>,
    pub description: String,
    pub photo: Photo,
    // Work
    pub organization: String,
    pub title: String,
    // Addresses
    pub addr_home: PostalAddress,
    pub addr_work: PostalAddress,
    // Internet
    pub nick_name: String,
    pub url: String,
    pub jabber_name: String,
    pub icq_name: String,
    pub skype_name: String,
    // Format internals
    /// Optional source-assigned id (lookup only, never used for matching)
    pub id: String,
    pub original_format: String,
    pub version: String,
    pub sub_version: String,
    /// Known but not modeled tags
    pub other_tags: Vec<TagValue>,
    /// Format-specific tags preserved for round-trip
    pub unknown_tags: Vec<TagValue>,
    // Derived by calculate_fields()
    pub sort_string: String,
    pub visible_name: String,
    pub pref_phone: String,
    pub pref_email: String,
    // Written by the matching engine only
    pub pair_state: PairState,
    pub pair: Option<PairRef>,
}

impl ContactItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn has_names(&self) -> bool {
        self.names.iter().any(|n| !n.trim().is_empty())
    }

    pub fn name(&self, slot: usize) -> &str {
        self.names.get(slot).map(String::as_str).unwrap_or("")
    }

    /// Index of the paired record in the other list, if any.
    pub fn pair_index(&self) -> Option<usize> {
        self.pair.map(|p| p.index)
    }

    pub fn clear_pairing(&mut self) {
        self.pair_state = PairState::NotFound;
        self.pair = None;
    }

    /// Store an anniversary, replacing the existing one.
    pub fn set_anniversary(&mut self, date: DateItem) {
        self.anniversaries.clear();
        if !date.is_empty() {
            self.anniversaries.push(date);
        }
        debug_assert!(self.anniversaries.len() <= MAX_ANN);
    }

    // -- editing ------------------------------------------------------------

    /// Swap given and family names.
    pub fn swap_names(&mut self) -> bool {
        if !self.has_names() {
            return false;
        }
        names::swap_given_family(&mut self.names)
    }

    /// Derive structured names from the full name when names are unset.
    pub fn split_names(&mut self) -> bool {
        if self.has_names() || self.full_name.trim().is_empty() {
            return false;
        }
        self.names = names::split_full_name(&self.full_name);
        log::debug!("split {:?} into {:?}", self.full_name, self.names);
        true
    }

    /// Strip backslashes left over from escaped source encodings out of all
    /// text fields. Returns false when there was nothing to strip.
    pub fn drop_slashes(&mut self) -> bool {
        let mut changed = false;
        let mut strip = |s: &mut String| {
            if s.contains('\\') {
                s.retain(|c| c != '\\');
                changed = true;
            }
        };

        strip(&mut self.full_name);
        self.names.iter_mut().for_each(&mut strip);
        self.phones.iter_mut().for_each(|p| strip(&mut p.value));
        self.emails.iter_mut().for_each(|e| strip(&mut e.value));
        for field in [
            &mut self.description,
            &mut self.organization,
            &mut self.title,
            &mut self.nick_name,
            &mut self.url,
            &mut self.jabber_name,
            &mut self.icq_name,
            &mut self.skype_name,
        ] {
            strip(field);
        }
        self.addr_home.parts_mut().into_iter().for_each(&mut strip);
        self.addr_work.parts_mut().into_iter().for_each(&mut strip);
        changed
    }

    /// Rewrite every phone into international form under `rule_index`.
    pub fn intl_phone_prefix(&mut self, rule_index: usize) -> bool {
        if rule_index >= phone::COUNTRY_RULES.len() {
            log::warn!("unknown country rule {rule_index}, phones left as written");
            return false;
        }
        if self.phones.is_empty() {
            return false;
        }
        for p in &mut self.phones {
            p.value = phone::expand_number(&p.value, rule_index);
        }
        true
    }

    /// Remove empty trailing name slots.
    pub fn drop_final_empty_names(&mut self) {
        names::drop_final_empty_names(&mut self.names);
    }

    /// Move the last word of the full name to the front.
    pub fn reverse_full_name(&mut self) {
        self.full_name = names::reverse_full_name(&self.full_name);
    }

    // -- derived fields -----------------------------------------------------

    pub fn format_names(&self) -> String {
        names::join_names(&self.names)
    }

    /// Best available display label: full name, then structured names, then
    /// organization, nickname, first email, first phone.
    pub fn make_generic_name(&self) -> String {
        let full = names::collapse_whitespace(&self.full_name);
        if !full.is_empty() {
            return full;
        }
        let joined = self.format_names();
        if !joined.is_empty() {
            return joined;
        }
        [
            self.organization.as_str(),
            self.nick_name.as_str(),
            self.emails.first().map(|e| e.value.as_str()).unwrap_or(""),
            self.phones.first().map(|p| p.value.as_str()).unwrap_or(""),
        ]
        .into_iter()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or("")
        .to_string()
    }

    fn preferred<K: ValueKind>(values: &[TypedValue<K>]) -> String {
        values
            .iter()
            .find(|v| v.has_type("pref"))
            .or_else(|| values.first())
            .map(|v| v.value.clone())
            .unwrap_or_default()
    }

    /// Recompute `visible_name`, `sort_string`, `pref_phone`, `pref_email`.
    ///
    /// Codecs call this after filling a record and editors after changing one.
    pub fn calculate_fields(&mut self) {
        self.visible_name = self.make_generic_name();

        let family_first = names::join_names(&[
            self.name(FAMILY).to_string(),
            self.name(GIVEN).to_string(),
            self.name(MIDDLE).to_string(),
        ]);
        self.sort_string = if family_first.is_empty() {
            self.visible_name.to_lowercase()
        } else {
            family_first.to_lowercase()
        };

        self.pref_phone = Self::preferred(&self.phones);
        self.pref_email = Self::preferred(&self.emails);
    }
}
