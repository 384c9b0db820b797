//! CSV import pipeline.
//!
//! Rows are read and validated one at a time; only the validated candidates
//! accumulate. Once the stream is exhausted the candidates are matched
//! against storage in a single lookup, partitioned by [`MergePlan`] and
//! applied. A stream or decode failure aborts the import; row validation and
//! individual update failures only show up in the [`ImportReport`].

use std::io::Read;

use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};

use crate::{
    config::ImportOptions,
    error::ImportError,
    identity::{distinct_keys, match_records},
    io_utils,
    merge::MergePlan,
    record::{CandidateRecord, RawRow},
    report::ImportReport,
    store::PodcastStore,
    validate::validate_row,
};

/// Where the CSV bytes come from and how to frame them.
#[derive(Debug, Clone, Copy)]
pub struct CsvSource {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl Default for CsvSource {
    fn default() -> Self {
        Self {
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
        }
    }
}

/// Imports with comma framing and UTF-8 input.
pub fn import_csv<R, S>(
    input: R,
    store: &mut S,
    options: &ImportOptions,
) -> Result<ImportReport, ImportError>
where
    R: Read,
    S: PodcastStore + ?Sized,
{
    import_csv_with(input, CsvSource::default(), store, options)
}

pub fn import_csv_with<R, S>(
    input: R,
    source: CsvSource,
    store: &mut S,
    options: &ImportOptions,
) -> Result<ImportReport, ImportError>
where
    R: Read,
    S: PodcastStore + ?Sized,
{
    let mut reader = io_utils::open_csv_reader(input, source.delimiter);
    let headers = read_headers(&mut reader, source.encoding)?;
    debug!("Resolved headers: {:?}", headers);

    let mut report = ImportReport::new(headers.clone(), options.max_error_messages);
    let candidates = collect_candidates(
        &mut reader,
        &headers,
        source.encoding,
        options,
        &mut report,
    )?;
    info!(
        "Validated {} of {} row(s)",
        candidates.len(),
        report.total_rows
    );

    let keys = distinct_keys(&candidates);
    let existing = if keys.is_empty() {
        Vec::new()
    } else {
        store
            .find_existing_by_identity_keys(&keys)
            .map_err(ImportError::Lookup)?
    };
    debug!(
        "{} distinct key(s), {} already stored",
        keys.len(),
        existing.len()
    );

    let plan = MergePlan::build(match_records(candidates, &existing), options.overwrite);
    info!(
        "Plan: {} to create, {} to update, {} to skip",
        plan.to_create.len(),
        plan.to_update.len(),
        plan.to_skip.len()
    );
    plan.apply(store, &mut report)?;

    info!(
        "Import finished: {} imported, {} updated, {} skipped, {} error(s)",
        report.imported, report.updated, report.duplicates_skipped, report.errors
    );
    Ok(report)
}

fn read_headers<R: Read>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<String>, ImportError> {
    let raw = reader.byte_headers().map_err(ImportError::Headers)?;
    let decoded = io_utils::decode_record(raw, encoding).ok_or(ImportError::Decode {
        row: 0,
        encoding: encoding.name(),
    })?;
    Ok(decoded
        .into_iter()
        .map(|header| header.trim().to_string())
        .collect())
}

fn collect_candidates<R: Read>(
    reader: &mut csv::Reader<R>,
    headers: &[String],
    encoding: &'static Encoding,
    options: &ImportOptions,
    report: &mut ImportReport,
) -> Result<Vec<(usize, CandidateRecord)>, ImportError> {
    let mut candidates = Vec::new();
    let mut record = csv::ByteRecord::new();
    let mut row = 0usize;
    loop {
        let has_row = reader
            .read_byte_record(&mut record)
            .map_err(|source| ImportError::Stream {
                row: row + 1,
                source,
            })?;
        if !has_row {
            break;
        }
        row += 1;
        report.record_row();

        let values = io_utils::decode_record(&record, encoding).ok_or(ImportError::Decode {
            row,
            encoding: encoding.name(),
        })?;
        let raw = RawRow::from_record(headers, values);
        match validate_row(&raw, row, &options.aliases, &options.defaults) {
            Ok(candidate) => candidates.push((row, candidate)),
            Err(err) => {
                debug!("{err}");
                report.record_error(&err);
            }
        }
    }
    Ok(candidates)
}
