//! The single result value returned by an import.

use serde::Serialize;

use crate::{error::RowError, record::Podcast, table::render_table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub success: bool,
    pub imported: usize,
    pub updated: usize,
    pub duplicates_skipped: usize,
    /// Total number of row errors, including those not kept in `error_messages`.
    pub errors: usize,
    pub error_messages: Vec<String>,
    pub total_rows: usize,
    pub headers: Vec<String>,
    pub created: Vec<Podcast>,
    pub updated_records: Vec<Podcast>,
    #[serde(skip)]
    max_error_messages: usize,
}

impl ImportReport {
    pub fn new(headers: Vec<String>, max_error_messages: usize) -> Self {
        Self {
            success: true,
            imported: 0,
            updated: 0,
            duplicates_skipped: 0,
            errors: 0,
            error_messages: Vec::new(),
            total_rows: 0,
            headers,
            created: Vec::new(),
            updated_records: Vec::new(),
            max_error_messages,
        }
    }

    pub fn record_row(&mut self) {
        self.total_rows += 1;
    }

    /// Counts every error; keeps the message only while under the cap.
    pub fn record_error(&mut self, error: &RowError) {
        self.errors += 1;
        if self.error_messages.len() < self.max_error_messages {
            self.error_messages.push(error.to_string());
        }
    }

    pub fn record_skipped(&mut self, count: usize) {
        self.duplicates_skipped += count;
    }

    pub fn record_created(&mut self, podcasts: Vec<Podcast>) {
        self.imported += podcasts.len();
        self.created.extend(podcasts);
    }

    pub fn record_updated(&mut self, podcast: Podcast) {
        self.updated += 1;
        self.updated_records.push(podcast);
    }

    /// Holds when every row was classified exactly once.
    pub fn is_consistent(&self) -> bool {
        self.imported + self.updated + self.duplicates_skipped + self.errors == self.total_rows
    }

    pub fn truncated_errors(&self) -> usize {
        self.errors - self.error_messages.len()
    }

    pub fn render_summary(&self) -> String {
        let headers = vec!["outcome".to_string(), "rows".to_string()];
        let rows = [
            ("total", self.total_rows),
            ("imported", self.imported),
            ("updated", self.updated),
            ("duplicates skipped", self.duplicates_skipped),
            ("errors", self.errors),
        ]
        .into_iter()
        .map(|(label, count)| vec![label.to_string(), count.to_string()])
        .collect::<Vec<_>>();

        let mut out = render_table(&headers, &rows);
        for message in &self.error_messages {
            out.push_str(message);
            out.push('\n');
        }
        if self.truncated_errors() > 0 {
            out.push_str(&format!(
                "... and {} more error(s)\n",
                self.truncated_errors()
            ));
        }
        out
    }
}
