#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use podcast_import::{
    identity::IdentityKey,
    record::{CandidateRecord, Podcast},
    store::{MemoryStore, PodcastStore, StoreError},
};
use tempfile::{TempDir, tempdir};
use uuid::Uuid;

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }
}

pub fn candidate(title: &str, host: &str) -> CandidateRecord {
    CandidateRecord {
        title: title.to_string(),
        host: host.to_string(),
        country: "Unknown".to_string(),
        language: "English".to_string(),
        year: 2020,
        status: "Active".to_string(),
        categories: Vec::new(),
        episode_length: None,
        episode_count: None,
        description: None,
        image_url: None,
        social_links: Default::default(),
    }
}

/// A store pre-seeded with one podcast per `(title, host)` pair.
pub fn seeded_store(entries: &[(&str, &str)]) -> MemoryStore {
    let mut store = MemoryStore::new();
    store
        .bulk_insert(entries.iter().map(|(t, h)| candidate(t, h)).collect())
        .expect("seed store");
    store
}

/// Wraps a [`MemoryStore`] and injects failures.
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub reject_bulk_insert: bool,
    /// Updates whose new title equals one of these fail.
    pub reject_update_titles: Vec<String>,
    pub bulk_insert_calls: usize,
    pub update_calls: usize,
}

impl PodcastStore for FlakyStore {
    fn bulk_insert(&mut self, records: Vec<CandidateRecord>) -> Result<Vec<Podcast>, StoreError> {
        self.bulk_insert_calls += 1;
        if self.reject_bulk_insert {
            return Err(StoreError::Rejected("unique constraint violated".to_string()));
        }
        self.inner.bulk_insert(records)
    }

    fn find_existing_by_identity_keys(
        &self,
        keys: &[IdentityKey],
    ) -> Result<Vec<Podcast>, StoreError> {
        self.inner.find_existing_by_identity_keys(keys)
    }

    fn update_by_id(&mut self, id: Uuid, record: CandidateRecord) -> Result<Podcast, StoreError> {
        self.update_calls += 1;
        if self.reject_update_titles.contains(&record.title) {
            return Err(StoreError::Rejected("row locked".to_string()));
        }
        self.inner.update_by_id(id, record)
    }
}
