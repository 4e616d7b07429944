// Contact file formats

pub mod csv;
pub mod format;
pub mod profiles;

pub use crate::csv::CsvFile;
pub use format::{detect_format, ContactFormat, FormatError, ImportReport};
pub use profiles::{CsvProfile, ExplayProfile, GenericProfile};
