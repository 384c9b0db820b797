mod common;

use std::io::{self, Read};

use common::{FlakyStore, seeded_store};
use podcast_import::{
    config::ImportOptions,
    error::ImportError,
    import::{CsvSource, import_csv, import_csv_with},
    report::ImportReport,
    store::{MemoryStore, PodcastStore},
};
use proptest::prelude::*;

fn run(csv: &str, store: &mut MemoryStore, overwrite: bool) -> ImportReport {
    let options = ImportOptions::default().with_overwrite(overwrite);
    import_csv(csv.as_bytes(), store, &options).expect("import succeeds")
}

#[test]
fn imports_new_podcasts_with_defaults() {
    let mut store = MemoryStore::new();
    let report = run(
        "Podcast Title,Host,Categories,Year\nWine Talk,Jane Doe,\"Education, Culture, \",2018\nSip,Bob,,\n",
        &mut store,
        false,
    );

    assert!(report.success);
    assert_eq!(report.total_rows, 2);
    assert_eq!(report.imported, 2);
    assert_eq!(report.errors, 0);
    assert_eq!(report.headers, vec!["Podcast Title", "Host", "Categories", "Year"]);
    assert_eq!(store.len(), 2);

    let wine = &report.created[0].record;
    assert_eq!(wine.title, "Wine Talk");
    assert_eq!(wine.categories, vec!["Education", "Culture"]);
    assert_eq!(wine.year, 2018);
    assert_eq!(wine.country, "Unknown");
    assert_eq!(wine.language, "English");
    assert_eq!(wine.status, "Active");
    assert!(report.is_consistent());
}

#[test]
fn missing_host_is_a_row_error_and_batch_continues() {
    let mut store = MemoryStore::new();
    let report = run(
        "Podcast Title,host\nWine Talk,\nSip,Bob\n",
        &mut store,
        false,
    );

    assert_eq!(report.errors, 1);
    assert!(report.error_messages[0].starts_with("Row 1: Missing host"));
    assert_eq!(report.imported, 1);
    assert_eq!(report.created[0].record.title, "Sip");
    assert!(report.is_consistent());
}

#[test]
fn existing_match_is_skipped_without_overwrite() {
    let mut store = seeded_store(&[("The Wine Hour", "Jane Doe")]);
    let report = run("title,host\nwine hour,JANE DOE\nNew Show,Ann\n", &mut store, false);

    assert_eq!(report.duplicates_skipped, 1);
    assert_eq!(report.updated, 0);
    assert_eq!(report.imported, 1);
    assert_eq!(store.len(), 2);
    assert_eq!(store.podcasts()[0].record.title, "The Wine Hour");
    assert!(report.is_consistent());
}

#[test]
fn existing_match_is_updated_with_overwrite() {
    let mut store = seeded_store(&[("The Wine Hour", "Jane Doe")]);
    let id = store.podcasts()[0].id;
    let report = run(
        "title,host,country\nWine Hour!,Jane Doe,France\n",
        &mut store,
        true,
    );

    assert_eq!(report.updated, 1);
    assert_eq!(report.imported, 0);
    assert_eq!(report.duplicates_skipped, 0);
    assert_eq!(report.updated_records[0].id, id);
    let stored = store.get(id).expect("still stored");
    assert_eq!(stored.record.title, "Wine Hour!");
    assert_eq!(stored.record.country, "France");
    assert_eq!(store.len(), 1);
}

#[test]
fn plural_title_is_a_different_podcast() {
    let mut store = seeded_store(&[("The Wine Hour", "Jane Doe")]);
    let report = run("title,host\nThe Wine Hours,Jane Doe\n", &mut store, false);
    assert_eq!(report.imported, 1);
    assert_eq!(report.duplicates_skipped, 0);
}

#[test]
fn repeated_rows_in_one_file_keep_the_first() {
    for overwrite in [false, true] {
        let mut store = MemoryStore::new();
        let report = run(
            "title,host,country\nWine Talk,Jane,Italy\nwine talk,jane,Spain\n",
            &mut store,
            overwrite,
        );
        assert_eq!(report.imported, 1);
        assert_eq!(report.duplicates_skipped, 1);
        assert_eq!(report.updated, 0);
        assert_eq!(store.podcasts()[0].record.country, "Italy");
        assert!(report.is_consistent());
    }
}

#[test]
fn error_messages_are_capped_at_twenty() {
    let mut csv = String::from("title,host\n");
    for idx in 0..35 {
        csv.push_str(&format!("Show {idx},\n"));
    }
    let mut store = MemoryStore::new();
    let report = run(&csv, &mut store, false);

    assert_eq!(report.errors, 35);
    assert_eq!(report.error_messages.len(), 20);
    assert!(report.error_messages[19].starts_with("Row 20:"));
    assert_eq!(report.total_rows, 35);
    assert!(store.is_empty());
}

#[test]
fn bulk_create_failure_aborts_before_updates() {
    let mut store = FlakyStore {
        inner: seeded_store(&[("Old Show", "Ann")]),
        reject_bulk_insert: true,
        ..Default::default()
    };
    let options = ImportOptions::default().with_overwrite(true);
    let err = import_csv(
        "title,host\nOld Show,Ann\nNew Show,Bob\n".as_bytes(),
        &mut store,
        &options,
    )
    .unwrap_err();

    assert!(matches!(err, ImportError::BulkCreate { count: 1, .. }));
    assert_eq!(store.bulk_insert_calls, 1);
    assert_eq!(store.update_calls, 0);
}

#[test]
fn failed_update_is_reported_and_others_continue() {
    let mut store = FlakyStore {
        inner: seeded_store(&[("Alpha", "Ann"), ("Beta", "Bob"), ("Gamma", "Gil")]),
        reject_update_titles: vec!["BETA".to_string()],
        ..Default::default()
    };
    let options = ImportOptions::default().with_overwrite(true);
    let report = import_csv(
        "title,host\nalpha,ann\nBETA,bob\ngamma,gil\n".as_bytes(),
        &mut store,
        &options,
    )
    .expect("import succeeds");

    assert_eq!(store.update_calls, 3);
    assert_eq!(report.updated, 2);
    assert_eq!(report.errors, 1);
    assert!(report.error_messages[0].starts_with("Row 2: Failed to update \"BETA\""));
    assert!(report.is_consistent());
    assert_eq!(store.bulk_insert_calls, 0);
}

#[test]
fn semicolon_latin1_export_is_decoded() {
    let bytes = b"Titolo;Conduttore;Pa\xEDs\nVino Veritas;Marco;Italia\n".to_vec();
    let source = CsvSource {
        delimiter: b';',
        encoding: encoding_rs::WINDOWS_1252,
    };
    let mut store = MemoryStore::new();
    let report = import_csv_with(bytes.as_slice(), source, &mut store, &ImportOptions::default())
        .expect("import succeeds");
    assert_eq!(report.headers[2], "País");
    assert_eq!(store.podcasts()[0].record.country, "Italia");
    assert_eq!(store.podcasts()[0].record.host, "Marco");
}

#[test]
fn invalid_utf8_aborts_the_import() {
    let mut store = MemoryStore::new();
    let err = import_csv(
        b"title,host\nCaf\xE9 Talk,Ann\n".as_slice(),
        &mut store,
        &ImportOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ImportError::Decode { row: 1, .. }));
    assert!(store.is_empty());
}

struct BrokenPipe {
    sent: bool,
}

impl Read for BrokenPipe {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.sent {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "upload interrupted"));
        }
        self.sent = true;
        let chunk = b"title,host\nWine Talk,Jane\n";
        buf[..chunk.len()].copy_from_slice(chunk);
        Ok(chunk.len())
    }
}

#[test]
fn stream_failure_aborts_without_writes() {
    let mut store = MemoryStore::new();
    let err = import_csv(BrokenPipe { sent: false }, &mut store, &ImportOptions::default())
        .unwrap_err();
    assert!(matches!(err, ImportError::Stream { .. }));
    assert!(store.is_empty());
}

#[test]
fn separator_only_lines_are_rows_missing_title() {
    let mut store = MemoryStore::new();
    let report = run(
        "title,host\nWine Talk,Jane\n,\n\"\",\"\"\n  ,  \nSip,Bob\n",
        &mut store,
        false,
    );
    assert_eq!(report.total_rows, 5);
    assert_eq!(report.imported, 2);
    assert_eq!(report.errors, 3);
    for (message, row) in report.error_messages.iter().zip(2..=4) {
        assert!(message.starts_with(&format!("Row {row}: Missing title")));
    }
    assert!(report.is_consistent());
}

#[test]
fn header_only_file_produces_empty_report() {
    let mut store = MemoryStore::new();
    let report = run("title,host\n", &mut store, false);
    assert_eq!(report.total_rows, 0);
    assert!(report.created.is_empty());
    assert!(report.is_consistent());
}

#[test]
fn second_import_of_same_file_is_idempotent() {
    let csv = "title,host\nWine Talk,Jane\nSip,Bob\n";
    let mut store = MemoryStore::new();
    run(csv, &mut store, false);
    let second = run(csv, &mut store, false);
    assert_eq!(second.imported, 0);
    assert_eq!(second.duplicates_skipped, 2);
    assert_eq!(store.len(), 2);
    assert_eq!(
        store
            .find_existing_by_identity_keys(&[store.podcasts()[0].identity_key.clone()])
            .unwrap()
            .len(),
        1
    );
}

/// One CSV line per `(kind, n)`: a fresh show, a stored show, a row
/// missing its host, or a separator-only line.
fn mixed_line(kind: u8, n: u8) -> String {
    match kind {
        0 => format!("Fresh Show {n},Ann"),
        1 => format!("the stored show {n},ANN"),
        2 => format!("Hostless {n},"),
        _ => ",".to_string(),
    }
}

proptest! {
    #[test]
    fn every_row_is_counted_exactly_once(
        lines in proptest::collection::vec((0u8..4, 0u8..3), 0..25),
        overwrite in any::<bool>(),
    ) {
        let mut store = seeded_store(&[
            ("Stored Show 0", "Ann"),
            ("Stored Show 1", "Ann"),
            ("Stored Show 2", "Ann"),
        ]);
        let mut csv = String::from("title,host\n");
        for (kind, n) in &lines {
            csv.push_str(&mixed_line(*kind, *n));
            csv.push('\n');
        }
        let report = run(&csv, &mut store, overwrite);

        prop_assert!(report.is_consistent());
        prop_assert_eq!(report.total_rows, lines.len());
        let invalid = lines.iter().filter(|(kind, _)| *kind >= 2).count();
        prop_assert_eq!(report.errors, invalid);
        if !overwrite {
            prop_assert_eq!(report.updated, 0);
        }
        prop_assert_eq!(store.len(), 3 + report.imported);
    }
}
