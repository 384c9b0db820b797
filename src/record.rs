//! Data model shared by every import stage.
//!
//! - [`RawRow`]: one decoded CSV line keyed by its (trimmed) header strings.
//! - [`CandidateRecord`]: a validated, typed podcast prior to persistence.
//! - [`Podcast`]: a record owned by a [`crate::store::PodcastStore`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::IdentityKey;

/// A single CSV row as `(header, value)` pairs in source column order.
///
/// Duplicate headers are kept; exact lookups return the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    /// Zips a header row with a data row. Missing trailing cells are treated
    /// as absent and surplus cells without a header are dropped.
    pub fn from_record(headers: &[String], values: Vec<String>) -> Self {
        let cells = headers
            .iter()
            .cloned()
            .zip(values)
            .collect::<Vec<_>>();
        Self { cells }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A resolved podcast ready to be created or used to update an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub title: String,
    pub host: String,
    pub country: String,
    pub language: String,
    pub year: i32,
    pub status: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Platform name (e.g. `instagram`) to profile URL.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub social_links: BTreeMap<String, String>,
}

impl CandidateRecord {
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(&self.title, &self.host)
    }
}

/// A podcast as held by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Podcast {
    pub id: Uuid,
    pub identity_key: IdentityKey,
    #[serde(flatten)]
    pub record: CandidateRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Podcast {
    pub fn new(record: CandidateRecord, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity_key: record.identity_key(),
            record,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the record fields, keeping `id` and `created_at`.
    pub fn apply_update(&mut self, record: CandidateRecord, now: DateTime<Utc>) {
        self.identity_key = record.identity_key();
        self.record = record;
        self.updated_at = now;
    }
}
