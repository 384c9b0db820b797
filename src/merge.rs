//! Partitioning of matched records into create / update / skip, and applying
//! that plan to a [`PodcastStore`].

use log::{debug, warn};
use uuid::Uuid;

use crate::{
    error::{ImportError, RowError},
    identity::{IdentityKey, MatchOutcome, MatchedRecord},
    record::CandidateRecord,
    report::ImportReport,
    store::PodcastStore,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCreate {
    pub row: usize,
    pub record: CandidateRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpdate {
    pub row: usize,
    pub id: Uuid,
    pub record: CandidateRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Matches a persisted podcast and overwrite is off.
    Existing(Uuid),
    /// Repeats a key claimed by an earlier row of the same file.
    BatchDuplicate { first_row: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSkip {
    pub row: usize,
    pub key: IdentityKey,
    pub reason: SkipReason,
}

/// Three disjoint lists covering every matched record exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    pub to_create: Vec<PlannedCreate>,
    pub to_update: Vec<PlannedUpdate>,
    pub to_skip: Vec<PlannedSkip>,
}

impl MergePlan {
    pub fn build(matches: Vec<MatchedRecord>, overwrite: bool) -> Self {
        let mut plan = MergePlan::default();
        for matched in matches {
            let MatchedRecord {
                row,
                key,
                record,
                outcome,
            } = matched;
            match outcome {
                MatchOutcome::New => plan.to_create.push(PlannedCreate { row, record }),
                MatchOutcome::Existing(id) if overwrite => {
                    plan.to_update.push(PlannedUpdate { row, id, record })
                }
                MatchOutcome::Existing(id) => plan.to_skip.push(PlannedSkip {
                    row,
                    key,
                    reason: SkipReason::Existing(id),
                }),
                MatchOutcome::BatchDuplicate { first_row } => plan.to_skip.push(PlannedSkip {
                    row,
                    key,
                    reason: SkipReason::BatchDuplicate { first_row },
                }),
            }
        }
        plan
    }

    /// Creates in one bulk call, then updates one record at a time.
    ///
    /// A failed bulk create aborts before any update runs. A failed update is
    /// recorded as a row error and the remaining updates proceed.
    pub fn apply<S>(self, store: &mut S, report: &mut ImportReport) -> Result<(), ImportError>
    where
        S: PodcastStore + ?Sized,
    {
        for skip in &self.to_skip {
            match skip.reason {
                SkipReason::Existing(id) => {
                    debug!("Row {}: '{}' already stored as {id}", skip.row, skip.key)
                }
                SkipReason::BatchDuplicate { first_row } => debug!(
                    "Row {}: '{}' repeats row {first_row}",
                    skip.row, skip.key
                ),
            }
        }
        report.record_skipped(self.to_skip.len());

        if !self.to_create.is_empty() {
            let count = self.to_create.len();
            let records = self
                .to_create
                .into_iter()
                .map(|planned| planned.record)
                .collect::<Vec<_>>();
            let created = store
                .bulk_insert(records)
                .map_err(|source| ImportError::BulkCreate { count, source })?;
            debug!("Created {} podcast(s)", created.len());
            report.record_created(created);
        }

        for planned in self.to_update {
            let title = planned.record.title.clone();
            match store.update_by_id(planned.id, planned.record) {
                Ok(podcast) => report.record_updated(podcast),
                Err(err) => {
                    warn!("Row {}: update of {} failed: {err}", planned.row, planned.id);
                    report.record_error(&RowError::UpdateFailed {
                        row: planned.row,
                        title,
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
