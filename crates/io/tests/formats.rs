use std::path::PathBuf;

use twincard_engine::{ContactItem, ContactList, FormatOptions, PostalAddress};
use twincard_io::{detect_format, ContactFormat, CsvFile, FormatError};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[test]
fn malformed_row_is_reported_and_skipped() {
    let path = fixtures_dir().join("explay.csv");
    let mut format = detect_format(&path, &FormatOptions::default()).expect("csv detected");
    let mut list = ContactList::new();
    let report = format.import_records(&path, &mut list, false).unwrap();

    assert_eq!(report.records_read, 2);
    assert_eq!(list.len(), 2);
    assert_eq!(report.errors, vec!["CSV row too short for this profile at line 3".to_string()]);
    assert!(report.warnings.iter().any(|m| m.contains("SIP address")));

    let ivan = &list[0];
    assert_eq!(ivan.visible_name, "Ivan Petrov");
    assert_eq!(ivan.birthday.date().map(|d| d.to_string()), Some("1985-04-12".into()));
    assert_eq!(ivan.phones.len(), 2);
    assert_eq!(ivan.pref_phone, "89123456789");
    assert_eq!(list[1].url, "http://example.com");
}

#[test]
fn generic_file_round_trips_through_export() {
    let source = fixtures_dir().join("generic.csv");
    let mut csv = CsvFile::new(FormatOptions::default());
    let mut list = ContactList::new();
    let report = csv.import_records(&source, &mut list, false).unwrap();
    assert_eq!(report.records_read, 2);
    assert!(!report.has_messages(), "{:?}", report);
    assert_eq!(list[0].pref_email, "john@example.com");
    assert_eq!(list[1].phones[0].types, vec!["work".to_string()]);

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.csv");
    csv.export_records(&target, &list).unwrap();

    let mut again = ContactList::new();
    CsvFile::new(FormatOptions::default())
        .import_records(&target, &mut again, false)
        .unwrap();
    assert_eq!(again.len(), list.len());
    for (a, b) in list.iter().zip(again.iter()) {
        assert_eq!(a.names, b.names);
        assert_eq!(a.phones, b.phones);
        assert_eq!(a.emails, b.emails);
        assert_eq!(a.birthday, b.birthday);
        assert_eq!(a.id, b.id);
    }
}

#[test]
fn export_warns_about_dropped_fields() {
    let mut item = ContactItem::new();
    item.full_name = "Ann Lee".into();
    item.addr_home = PostalAddress {
        city: "Oslo".into(),
        ..PostalAddress::default()
    };
    item.calculate_fields();
    let list: ContactList = vec![item].into_iter().collect();

    let dir = tempfile::tempdir().unwrap();
    let report = CsvFile::new(FormatOptions::default())
        .export_records(&dir.path().join("ann.csv"), &list)
        .unwrap();
    assert_eq!(report.records_read, 1);
    assert_eq!(
        report.warnings,
        vec!["1 records have postal addresses, which Generic CSV does not store".to_string()]
    );
}

#[test]
fn empty_list_is_not_exported() {
    let dir = tempfile::tempdir().unwrap();
    let err = CsvFile::new(FormatOptions::default())
        .export_records(&dir.path().join("none.csv"), &ContactList::new())
        .unwrap_err();
    assert!(matches!(err, FormatError::NoRecords(_)));
}

#[test]
fn content_detection_without_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backup.txt");
    std::fs::copy(fixtures_dir().join("explay.csv"), &path).unwrap();
    assert!(detect_format(&path, &FormatOptions::default()).is_some());

    let other = dir.path().join("notes.txt");
    std::fs::write(&other, "just some notes\n").unwrap();
    assert!(detect_format(&other, &FormatOptions::default()).is_none());
}

#[test]
fn missing_file_is_an_io_error() {
    let mut list = ContactList::new();
    let err = CsvFile::new(FormatOptions::default())
        .import_records(&fixtures_dir().join("absent.csv"), &mut list, false)
        .unwrap_err();
    assert!(matches!(err, FormatError::Io { .. }));
    assert!(err.to_string().contains("absent.csv"));
}
