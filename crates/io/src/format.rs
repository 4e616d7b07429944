//! Codec contract shared by every contact file format.

use std::path::Path;

use thiserror::Error;
use twincard_engine::{ContactList, FormatOptions};

use crate::csv::CsvFile;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("unknown file format: {0}")]
    UnknownFormat(String),
    #[error("{0} files can be read but not written")]
    ReadOnly(&'static str),
    #[error("no records in {0}")]
    NoRecords(String),
}

impl FormatError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        FormatError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Non-fatal outcome of an import or export.
///
/// `errors` lists rows that were rejected and skipped; `warnings` lists
/// data-quality notes on records that were kept. Neither means the
/// operation failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub records_read: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ImportReport {
    /// Record a skipped row.
    pub fn reject(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("rejected: {message}");
        self.errors.push(message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.warnings.push(message);
    }

    pub fn has_messages(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }

    /// Errors first, then warnings.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().chain(&self.warnings).map(String::as_str)
    }
}

/// A pluggable on-disk contact format.
pub trait ContactFormat {
    /// Human-readable format name, used in messages
    fn name(&self) -> &'static str;

    /// Lowercase file extensions without the dot
    fn supported_extensions(&self) -> &'static [&'static str];

    /// Whether `path` looks like this format, by extension or content.
    fn detect(&self, path: &Path) -> bool;

    /// Read records from `path` into `list`.
    ///
    /// With `append` false the list is cleared first. Every imported record
    /// has had `calculate_fields` run on it. Malformed rows are skipped and
    /// listed in the report's `errors`; only file-level problems fail.
    fn import_records(
        &mut self,
        path: &Path,
        list: &mut ContactList,
        append: bool,
    ) -> Result<ImportReport, FormatError>;

    /// Write every record of `list` to `path`. Fields the format cannot
    /// hold are dropped and reported in the returned warnings.
    fn export_records(&mut self, path: &Path, list: &ContactList) -> Result<ImportReport, FormatError>;
}

pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Pick a codec for `path`, or `None` when no known format claims it.
pub fn detect_format(path: &Path, options: &FormatOptions) -> Option<Box<dyn ContactFormat>> {
    let candidates: Vec<Box<dyn ContactFormat>> = vec![Box::new(CsvFile::new(options.clone()))];
    candidates.into_iter().find(|format| format.detect(path))
}
