//! `twincard-engine`: contact record model.
//!
//! Names, phones and dates are normalized here so records from different
//! file formats become comparable. No file IO.

pub mod date;
pub mod item;
pub mod list;
pub mod names;
pub mod options;
pub mod phone;

pub use date::{DateFormat, DateItem};
pub use item::{ContactItem, Email, PairRef, PairState, Phone, PostalAddress, TypedValue};
pub use list::{ContactList, ListExtra, ListId, ListStatistics};
pub use options::FormatOptions;
