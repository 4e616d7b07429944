use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use twincard_engine::{ContactItem, ContactList, FormatOptions};

use crate::format::{has_extension, ContactFormat, FormatError, ImportReport};
use crate::profiles::{builtin_profiles, CsvProfile, GenericProfile};

/// Comma-separated contact files.
///
/// The column layout comes from a [`CsvProfile`]. A profile set with
/// [`CsvFile::with_profile`] is used for every import and export; otherwise
/// each import detects one from its own header row and export writes
/// [`GenericProfile`].
pub struct CsvFile {
    options: FormatOptions,
    profile: Option<Box<dyn CsvProfile>>,
    /// Detected by the most recent import
    detected: Option<Box<dyn CsvProfile>>,
}

impl CsvFile {
    pub fn new(options: FormatOptions) -> Self {
        Self {
            options,
            profile: None,
            detected: None,
        }
    }

    pub fn with_profile(mut self, profile: Box<dyn CsvProfile>) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Profile set explicitly, or the one the last import detected.
    pub fn profile_name(&self) -> Option<&'static str> {
        self.profile.as_ref().or(self.detected.as_ref()).map(|p| p.name())
    }

    /// Import from in-memory text. See [`ContactFormat::import_records`].
    pub fn import_str(
        &mut self,
        content: &str,
        list: &mut ContactList,
        append: bool,
    ) -> Result<ImportReport, FormatError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        if content.trim().is_empty() {
            return Err(FormatError::NoRecords("empty CSV input".to_string()));
        }

        let delimiter = sniff_delimiter(content);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());
        let mut rows = reader.records();

        let first = match rows.next() {
            Some(row) => row?,
            None => return Err(FormatError::NoRecords("empty CSV input".to_string())),
        };
        if self.profile.is_none() {
            self.detected = detect_profile(&first);
        }
        let Some(profile) = self.profile.as_deref().or(self.detected.as_deref()) else {
            let preview: Vec<&str> = first.iter().take(3).collect();
            return Err(FormatError::UnknownFormat(format!(
                "CSV header not recognized: {}",
                preview.join(", ")
            )));
        };
        log::debug!("CSV profile: {}, delimiter {:?}", profile.name(), delimiter as char);

        if !append {
            list.clear();
        }

        let mut report = ImportReport::default();
        let leading = (!profile.has_header()).then_some(Ok(first));
        for result in leading.into_iter().chain(rows) {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    report.reject(format!("Unreadable CSV row: {e}"));
                    continue;
                }
            };
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            if row.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            if row.len() < profile.min_fields() {
                report.reject(format!("CSV row too short for this profile at line {line}"));
                continue;
            }

            let mut item = ContactItem::new();
            item.original_format = "CSV".to_string();
            profile.import_record(&row, &mut item, &self.options, &mut report);
            self.finish_record(&mut item, line, &mut report);
            list.push(item);
            report.records_read += 1;
        }

        log::info!(
            "imported {} records as {} ({} rejected, {} warnings)",
            report.records_read,
            profile.name(),
            report.errors.len(),
            report.warnings.len()
        );
        Ok(report)
    }

    /// Defaults and checks that apply whatever the profile.
    fn finish_record(&self, item: &mut ContactItem, line: u64, report: &mut ImportReport) {
        for phone in &mut item.phones {
            if phone.types.is_empty() && !self.options.default_empty_phone_type.is_empty() {
                phone.types.push(self.options.default_empty_phone_type.clone());
            }
        }
        if self.options.warn_on_non_standard_types {
            let odd_types: Vec<(&'static str, String)> = item
                .phones
                .iter()
                .flat_map(|p| p.non_standard_types().into_iter().map(move |t| (p.kind_name(), t.to_string())))
                .chain(
                    item.emails
                        .iter()
                        .flat_map(|e| e.non_standard_types().into_iter().map(move |t| (e.kind_name(), t.to_string()))),
                )
                .collect();
            for (kind, tag) in odd_types {
                report.warn(format!("Non-standard {kind} type \"{tag}\" at line {line}"));
            }
        }
        item.calculate_fields();
    }

    /// Render `list` as CSV text with the set profile.
    pub fn export_string(&self, list: &ContactList) -> Result<(String, ImportReport), FormatError> {
        let generic = GenericProfile;
        let profile: &dyn CsvProfile = self.profile.as_deref().unwrap_or(&generic);
        if !profile.can_export() {
            return Err(FormatError::ReadOnly(profile.name()));
        }

        let mut report = ImportReport::default();
        let mut dropped: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(profile.columns())?;
        for item in list {
            writer.write_record(profile.export_record(item, &self.options)?)?;
            for name in profile.dropped_fields(item) {
                *dropped.entry(name).or_default() += 1;
            }
            report.records_read += 1;
        }
        for (name, count) in dropped {
            report.warn(format!("{count} records have {name}, which {} does not store", profile.name()));
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| FormatError::Csv(csv::Error::from(e.into_error())))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| FormatError::UnknownFormat(format!("non UTF-8 CSV output: {e}")))?;
        Ok((text, report))
    }
}

impl ContactFormat for CsvFile {
    fn name(&self) -> &'static str {
        "CSV"
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &["csv"]
    }

    fn detect(&self, path: &Path) -> bool {
        if has_extension(path, self.supported_extensions()) {
            return true;
        }
        let Ok(content) = read_file_as_utf8(path) else {
            return false;
        };
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        csv::ReaderBuilder::new()
            .delimiter(sniff_delimiter(content))
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes())
            .records()
            .next()
            .and_then(|r| r.ok())
            .is_some_and(|header| detect_profile(&header).is_some())
    }

    fn import_records(
        &mut self,
        path: &Path,
        list: &mut ContactList,
        append: bool,
    ) -> Result<ImportReport, FormatError> {
        let content = read_file_as_utf8(path).map_err(|e| FormatError::io(path, e))?;
        self.import_str(&content, list, append).map_err(|e| match e {
            FormatError::NoRecords(_) => FormatError::NoRecords(path.display().to_string()),
            other => other,
        })
    }

    fn export_records(&mut self, path: &Path, list: &ContactList) -> Result<ImportReport, FormatError> {
        if list.is_empty() {
            return Err(FormatError::NoRecords(path.display().to_string()));
        }
        let (text, report) = self.export_string(list)?;
        std::fs::write(path, text).map_err(|e| FormatError::io(path, e))?;
        log::info!("exported {} records to {}", report.records_read, path.display());
        Ok(report)
    }
}

fn detect_profile(header: &StringRecord) -> Option<Box<dyn CsvProfile>> {
    builtin_profiles().into_iter().find(|p| p.detect(header))
}

/// Delimiters seen in phone-suite and spreadsheet contact exports.
const DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// Pick the delimiter under which the most rows are at least as wide as
/// the header. Ties go to the wider header, then to comma.
fn sniff_delimiter(content: &str) -> u8 {
    fn width(line: &str, delim: u8) -> usize {
        csv::ReaderBuilder::new()
            .delimiter(delim)
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes())
            .records()
            .next()
            .and_then(Result::ok)
            .map_or(1, |r| r.len())
    }

    let mut lines = content.lines().filter(|l| !l.trim().is_empty()).take(8);
    let Some(header) = lines.next() else {
        return b',';
    };
    let rows: Vec<&str> = lines.collect();

    DELIMITERS
        .iter()
        .map(|&delim| {
            let columns = width(header, delim);
            let matching = rows.iter().filter(|&&row| width(row, delim) >= columns).count();
            (delim, columns, matching)
        })
        .filter(|&(_, columns, _)| columns > 1)
        .max_by_key(|&(delim, columns, matching)| (matching, columns, delim == b','))
        .map_or(b',', |(delim, _, _)| delim)
}

/// Read a file as UTF-8, falling back to Windows-1252 (phone suites and
/// spreadsheet exports often write it).
pub fn read_file_as_utf8(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            log::debug!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}
