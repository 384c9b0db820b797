//! Identity keys and duplicate matching against persisted podcasts.
//!
//! Two podcasts are the same when their normalized title and host match
//! exactly. Normalization lowercases, drops a fixed punctuation set, collapses
//! whitespace and removes leading articles. There is no similarity scoring:
//! differently worded near-duplicates are not merged.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{CandidateRecord, Podcast};

const KEY_SEPARATOR: char = '|';

const PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '\'', '"', '(', ')', '[', ']', '{', '}', '-', '_', '/', '\\',
    '&', '*', '#', '@', '~', '`', '|', '+', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}',
    '\u{2013}', '\u{2014}', '\u{2026}',
];

const LEADING_ARTICLES: &[&str] = &["the ", "a ", "an "];

/// Canonical `(title, host)` key used to detect the same podcast across imports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn new(title: &str, host: &str) -> Self {
        Self(format!(
            "{}{KEY_SEPARATOR}{}",
            normalize(title),
            normalize(host)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reduces a title or host to its canonical comparison form.
///
/// Articles are stripped repeatedly so that the function is idempotent:
/// `normalize(normalize(x)) == normalize(x)` for every input.
pub fn normalize(value: &str) -> String {
    let lowered = value.to_lowercase();
    let stripped = lowered
        .chars()
        .filter(|ch| !PUNCTUATION.contains(ch))
        .collect::<String>();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut rest = collapsed.as_str();
    while let Some(after) = LEADING_ARTICLES
        .iter()
        .find_map(|article| rest.strip_prefix(article))
    {
        rest = after;
    }
    rest.trim().to_string()
}

/// How an incoming record relates to what is already known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// No persisted podcast and no earlier row in this batch shares the key.
    New,
    /// A persisted podcast with this id shares the key.
    Existing(Uuid),
    /// An earlier row of the same batch already claimed the key.
    BatchDuplicate { first_row: usize },
}

/// A validated record with its key and match outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRecord {
    pub row: usize,
    pub key: IdentityKey,
    pub record: CandidateRecord,
    pub outcome: MatchOutcome,
}

/// Distinct keys of `candidates`, in first-seen order.
pub fn distinct_keys(candidates: &[(usize, CandidateRecord)]) -> Vec<IdentityKey> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .map(|(_, record)| record.identity_key())
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

/// Classifies every candidate against the persisted podcasts.
///
/// The first row carrying a key is matched against `existing`; later rows
/// with the same key become [`MatchOutcome::BatchDuplicate`].
pub fn match_records(
    candidates: Vec<(usize, CandidateRecord)>,
    existing: &[Podcast],
) -> Vec<MatchedRecord> {
    let persisted: HashMap<&IdentityKey, Uuid> = existing
        .iter()
        .map(|podcast| (&podcast.identity_key, podcast.id))
        .collect();
    let mut claimed: HashMap<IdentityKey, usize> = HashMap::new();

    candidates
        .into_iter()
        .map(|(row, record)| {
            let key = record.identity_key();
            let outcome = if let Some(&first_row) = claimed.get(&key) {
                MatchOutcome::BatchDuplicate { first_row }
            } else {
                claimed.insert(key.clone(), row);
                match persisted.get(&key) {
                    Some(id) => MatchOutcome::Existing(*id),
                    None => MatchOutcome::New,
                }
            };
            MatchedRecord {
                row,
                key,
                record,
                outcome,
            }
        })
        .collect()
}
