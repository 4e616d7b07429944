//! Contact lists
//!
//! A [`ContactList`] owns its records in insertion order (the order is user
//! visible) and carries format-specific data that belongs to the whole file
//! rather than to any single record.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::item::{ContactItem, PairState};

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a list, used by pairing handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ListId(pub u64);

impl ListId {
    fn next() -> Self {
        ListId(NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// One call-log entry from a phone backup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallInfo {
    pub call_type: String,
    pub time_stamp: String,
    pub duration: String,
    pub number: String,
    pub name: String,
}

/// Non-contact data that travels with a list (device model, call log,
/// organizer entries, notes, messages).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListExtra {
    pub model: String,
    pub time_stamp: String,
    pub organizer: Vec<String>,
    pub notes: Vec<String>,
    pub sms: Vec<String>,
    pub sms_archive: Vec<String>,
    pub calls: Vec<CallInfo>,
}

impl ListExtra {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug)]
pub struct ContactList {
    id: ListId,
    items: Vec<ContactItem>,
    pub extra: ListExtra,
}

impl Default for ContactList {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ContactList {
    /// A clone is a different list: it gets a fresh id and no pairing.
    fn clone(&self) -> Self {
        let mut list = Self {
            id: ListId::next(),
            items: self.items.clone(),
            extra: self.extra.clone(),
        };
        list.clear_pairing();
        list
    }
}

impl ContactList {
    pub fn new() -> Self {
        Self {
            id: ListId::next(),
            items: Vec::new(),
            extra: ListExtra::default(),
        }
    }

    pub fn id(&self) -> ListId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: ContactItem) {
        self.items.push(item);
    }

    /// Remove and return the record at `index`.
    ///
    /// Indices after it shift down, so any pairing handles into this list
    /// are stale afterwards; compare again before using them.
    pub fn remove(&mut self, index: usize) -> Option<ContactItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&ContactItem> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ContactItem> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContactItem> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ContactItem> {
        self.items.iter_mut()
    }

    pub fn items(&self) -> &[ContactItem] {
        &self.items
    }

    /// Drop all records and extra data. The list keeps its id.
    pub fn clear(&mut self) {
        self.items.clear();
        self.extra.clear();
    }

    /// Index of the first record whose `id` equals `id_value`.
    ///
    /// Ids are not guaranteed unique; later duplicates are never returned.
    pub fn find_by_id(&self, id_value: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id_value)
    }

    /// Reset pairing annotations on every record.
    pub fn clear_pairing(&mut self) {
        for item in &mut self.items {
            item.clear_pairing();
        }
    }

    /// The record in `other` that record `index` is paired with.
    ///
    /// Returns `None` when the record is unpaired or its handle does not
    /// point into `other`.
    pub fn pair_of<'a>(&self, index: usize, other: &'a ContactList) -> Option<&'a ContactItem> {
        let pair = self.items.get(index)?.pair?;
        if pair.list != other.id {
            return None;
        }
        other.items.get(pair.index)
    }

    pub fn statistics(&self) -> ListStatistics {
        let mut stats = ListStatistics {
            records: self.items.len(),
            ..ListStatistics::default()
        };
        for item in &self.items {
            stats.phones += item.phones.len();
            stats.emails += item.emails.len();
            stats.with_phone += usize::from(!item.phones.is_empty());
            stats.with_email += usize::from(!item.emails.is_empty());
            stats.with_birthday += usize::from(!item.birthday.is_empty());
            stats.with_anniversary += usize::from(!item.anniversaries.is_empty());
            stats.with_address +=
                usize::from(!item.addr_home.is_empty() || !item.addr_work.is_empty());
            stats.with_photo += usize::from(!item.photo.is_empty());
            stats.unknown_tags += item.unknown_tags.len();
            match item.pair_state {
                PairState::Identical => stats.identical += 1,
                PairState::Similar => stats.similar += 1,
                PairState::NotFound => {}
            }
        }
        stats.calls = self.extra.calls.len();
        stats
    }
}

impl Index<usize> for ContactList {
    type Output = ContactItem;

    fn index(&self, index: usize) -> &ContactItem {
        &self.items[index]
    }
}

impl IndexMut<usize> for ContactList {
    fn index_mut(&mut self, index: usize) -> &mut ContactItem {
        &mut self.items[index]
    }
}

impl<'a> IntoIterator for &'a ContactList {
    type Item = &'a ContactItem;
    type IntoIter = std::slice::Iter<'a, ContactItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Extend<ContactItem> for ContactList {
    fn extend<T: IntoIterator<Item = ContactItem>>(&mut self, iter: T) {
        self.items.extend(iter);
    }
}

impl FromIterator<ContactItem> for ContactList {
    fn from_iter<T: IntoIterator<Item = ContactItem>>(iter: T) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

/// Record and field counts for a list. `Display` renders the report text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListStatistics {
    pub records: usize,
    pub phones: usize,
    pub emails: usize,
    pub with_phone: usize,
    pub with_email: usize,
    pub with_birthday: usize,
    pub with_anniversary: usize,
    pub with_address: usize,
    pub with_photo: usize,
    pub unknown_tags: usize,
    pub identical: usize,
    pub similar: usize,
    pub calls: usize,
}

impl fmt::Display for ListStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} records", self.records)?;
        writeln!(f, "Has phone: {} ({} phones)", self.with_phone, self.phones)?;
        writeln!(f, "Has email: {} ({} emails)", self.with_email, self.emails)?;
        writeln!(f, "Has birthday: {}", self.with_birthday)?;
        writeln!(f, "Has anniversary: {}", self.with_anniversary)?;
        writeln!(f, "Has address: {}", self.with_address)?;
        writeln!(f, "Has photo: {}", self.with_photo)?;
        if self.unknown_tags > 0 {
            writeln!(f, "{} unknown tags found", self.unknown_tags)?;
        }
        if self.identical + self.similar > 0 {
            writeln!(f, "Paired: {} identical, {} similar", self.identical, self.similar)?;
        }
        if self.calls > 0 {
            writeln!(f, "Calls: {}", self.calls)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Email, PairRef, Phone};

    fn item(id: &str, name: &str) -> ContactItem {
        let mut item = ContactItem {
            id: id.into(),
            full_name: name.into(),
            ..ContactItem::default()
        };
        item.calculate_fields();
        item
    }

    #[test]
    fn lists_get_distinct_ids() {
        let a = ContactList::new();
        let b = ContactList::new();
        assert_ne!(a.id(), b.id());
        assert_ne!(a.clone().id(), a.id());
    }

    #[test]
    fn find_by_id_returns_first_match() {
        let list: ContactList = vec![item("7", "A"), item("8", "B"), item("8", "C")]
            .into_iter()
            .collect();
        assert_eq!(list.find_by_id("8"), Some(1));
        assert_eq!(list.find_by_id("9"), None);
    }

    #[test]
    fn order_is_insertion_order() {
        let mut list = ContactList::new();
        list.push(item("", "Zed"));
        list.push(item("", "Abe"));
        let names: Vec<&str> = list.iter().map(|i| i.visible_name.as_str()).collect();
        assert_eq!(names, vec!["Zed", "Abe"]);
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut list: ContactList = vec![item("", "A")].into_iter().collect();
        assert!(list.remove(5).is_none());
        assert_eq!(list.remove(0).map(|i| i.full_name), Some("A".to_string()));
        assert!(list.is_empty());
    }

    #[test]
    fn pair_of_checks_list_identity() {
        let other: ContactList = vec![item("", "B")].into_iter().collect();
        let unrelated: ContactList = vec![item("", "X")].into_iter().collect();
        let mut list: ContactList = vec![item("", "A")].into_iter().collect();
        list[0].pair_state = PairState::Identical;
        list[0].pair = Some(PairRef { list: other.id(), index: 0 });

        assert_eq!(list.pair_of(0, &other).map(|i| i.full_name.as_str()), Some("B"));
        assert!(list.pair_of(0, &unrelated).is_none());
    }

    #[test]
    fn statistics_counts_fields() {
        let mut a = item("", "A");
        a.phones.push(Phone::new("1", &[]));
        a.phones.push(Phone::new("2", &[]));
        a.emails.push(Email::new("a@x", &[]));
        let b = item("", "B");
        let mut list: ContactList = vec![a, b].into_iter().collect();
        list.extra.calls.push(CallInfo::default());

        let stats = list.statistics();
        assert_eq!(stats.records, 2);
        assert_eq!(stats.phones, 2);
        assert_eq!(stats.with_phone, 1);
        assert_eq!(stats.with_email, 1);
        assert_eq!(stats.calls, 1);

        let text = stats.to_string();
        assert!(text.starts_with("2 records"));
        assert!(text.contains("Has phone: 1 (2 phones)"));
    }

    #[test]
    fn clear_keeps_identity() {
        let mut list: ContactList = vec![item("", "A")].into_iter().collect();
        list.extra.model = "Explay".into();
        let id = list.id();
        list.clear();
        assert!(list.is_empty());
        assert!(list.extra.is_empty());
        assert_eq!(list.id(), id);
    }
}
