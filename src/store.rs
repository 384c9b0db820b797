//! Persistence collaborator consumed by the import pipeline.
//!
//! The pipeline only needs three operations: bulk insert, lookup by identity
//! key and update by id. [`MemoryStore`] implements them over a `Vec`;
//! [`JsonFileStore`] adds load/save of a pretty-printed JSON catalog.

use std::{
    collections::HashSet,
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::Utc;
use log::debug;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    identity::IdentityKey,
    record::{CandidateRecord, Podcast},
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Podcast {0} not found")]
    NotFound(Uuid),
    #[error("Store rejected the write: {0}")]
    Rejected(String),
    #[error("Accessing catalog file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parsing catalog file {path:?}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub trait PodcastStore {
    /// Inserts every record or none of them.
    fn bulk_insert(&mut self, records: Vec<CandidateRecord>) -> Result<Vec<Podcast>, StoreError>;

    /// Persisted podcasts whose identity key is in `keys`.
    fn find_existing_by_identity_keys(
        &self,
        keys: &[IdentityKey],
    ) -> Result<Vec<Podcast>, StoreError>;

    fn update_by_id(&mut self, id: Uuid, record: CandidateRecord) -> Result<Podcast, StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    podcasts: Vec<Podcast>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_podcasts(podcasts: Vec<Podcast>) -> Self {
        Self { podcasts }
    }

    pub fn podcasts(&self) -> &[Podcast] {
        &self.podcasts
    }

    pub fn len(&self) -> usize {
        self.podcasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.podcasts.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Podcast> {
        self.podcasts.iter().find(|podcast| podcast.id == id)
    }
}

impl PodcastStore for MemoryStore {
    fn bulk_insert(&mut self, records: Vec<CandidateRecord>) -> Result<Vec<Podcast>, StoreError> {
        let now = Utc::now();
        let created = records
            .into_iter()
            .map(|record| Podcast::new(record, now))
            .collect::<Vec<_>>();
        self.podcasts.extend(created.iter().cloned());
        Ok(created)
    }

    fn find_existing_by_identity_keys(
        &self,
        keys: &[IdentityKey],
    ) -> Result<Vec<Podcast>, StoreError> {
        let wanted = keys.iter().collect::<HashSet<_>>();
        Ok(self
            .podcasts
            .iter()
            .filter(|podcast| wanted.contains(&podcast.identity_key))
            .cloned()
            .collect())
    }

    fn update_by_id(&mut self, id: Uuid, record: CandidateRecord) -> Result<Podcast, StoreError> {
        let podcast = self
            .podcasts
            .iter_mut()
            .find(|podcast| podcast.id == id)
            .ok_or(StoreError::NotFound(id))?;
        podcast.apply_update(record, Utc::now());
        Ok(podcast.clone())
    }
}

/// A [`MemoryStore`] backed by a JSON array on disk.
///
/// Writes only reach the file on [`JsonFileStore::save`].
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Loads the catalog at `path`; a missing file is an empty catalog.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let podcasts = if path.exists() {
            let file = File::open(path).map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let mut podcasts: Vec<Podcast> = serde_json::from_reader(BufReader::new(file))
                .map_err(|source| StoreError::Serialization {
                    path: path.to_path_buf(),
                    source,
                })?;
            // Keys may be stale if the file was edited by hand.
            for podcast in &mut podcasts {
                podcast.identity_key = podcast.record.identity_key();
            }
            podcasts
        } else {
            Vec::new()
        };
        debug!("Loaded {} podcast(s) from {:?}", podcasts.len(), path);
        Ok(Self {
            path: path.to_path_buf(),
            inner: MemoryStore::with_podcasts(podcasts),
        })
    }

    pub fn podcasts(&self) -> &[Podcast] {
        self.inner.podcasts()
    }

    /// Writes the catalog to a sibling temp file, then renames it into place.
    pub fn save(&self) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let tmp = self.path.with_extension("json.tmp");
        {
            let file = File::create(&tmp).map_err(io_err)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, self.inner.podcasts()).map_err(|source| {
                StoreError::Serialization {
                    path: tmp.clone(),
                    source,
                }
            })?;
            writer.flush().map_err(io_err)?;
        }
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        debug!(
            "Saved {} podcast(s) to {:?}",
            self.inner.len(),
            self.path
        );
        Ok(())
    }
}

impl PodcastStore for JsonFileStore {
    fn bulk_insert(&mut self, records: Vec<CandidateRecord>) -> Result<Vec<Podcast>, StoreError> {
        self.inner.bulk_insert(records)
    }

    fn find_existing_by_identity_keys(
        &self,
        keys: &[IdentityKey],
    ) -> Result<Vec<Podcast>, StoreError> {
        self.inner.find_existing_by_identity_keys(keys)
    }

    fn update_by_id(&mut self, id: Uuid, record: CandidateRecord) -> Result<Podcast, StoreError> {
        self.inner.update_by_id(id, record)
    }
}
