//! Incremental merge of change batches into a bounded live view.
//!
//! Upstream live queries deliver batches of added/modified/removed documents
//! that may repeat or arrive out of timestamp order. [`merge_batch`] folds one
//! batch into the previous [`LocalView`] without refetching the collection:
//!
//! 1. drop removed ids (before anything else, so remove+add in one batch
//!    leaves the entity present),
//! 2. replace modified entities wholesale, ignoring ids not in the view,
//! 3. append added entities whose id is not already tracked,
//! 4. sort by `(order_key, arrival seq)` in the configured direction,
//! 5. trim to `max_size`, keeping the most recent entries.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{decode_batch, ChangeEvent, LiveEntity, LocalView, RawChange, ViewEntry};
use crate::errors::{Error, MalformedEvent, Result};

/// Direction a view is sorted in by its order key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first (chat).
    #[default]
    Ascending,
    /// Newest first (listings, notifications).
    Descending,
}

/// Per-collection configuration for a synchronizer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    /// Upper bound on the number of entities kept in the view.
    pub max_size: usize,
    pub order: SortOrder,
}

impl SyncConfig {
    pub fn new(max_size: usize, order: SortOrder) -> Result<Self> {
        let config = Self { max_size, order };
        config.validate()?;
        Ok(config)
    }

    pub fn ascending(max_size: usize) -> Result<Self> {
        Self::new(max_size, SortOrder::Ascending)
    }

    pub fn descending(max_size: usize) -> Result<Self> {
        Self::new(max_size, SortOrder::Descending)
    }

    /// Checks a configuration built by hand or deserialized from a file.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(Error::InvalidConfig(
                "max_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Counters describing what a single batch did to a view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStats {
    pub added: usize,
    pub modified: usize,
    pub removed: usize,
    /// Modified events for ids not present in the view.
    pub ignored_modifications: usize,
    /// Added events for ids already present in the view.
    pub duplicate_adds: usize,
    /// Added events superseded by a later add of the same id in the same batch.
    pub superseded_adds: usize,
    pub evicted: usize,
    pub rejected: usize,
}

impl MergeStats {
    /// True when the batch left the view contents untouched.
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.modified == 0 && self.removed == 0 && self.evicted == 0
    }
}

/// Result of [`merge_batch`].
#[derive(Clone, Debug)]
pub struct MergeOutcome<T> {
    pub view: LocalView<T>,
    pub stats: MergeStats,
    pub rejected: Vec<MalformedEvent>,
}

/// Diagnostics for one applied batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchReport {
    pub stats: MergeStats,
    pub rejected: Vec<MalformedEvent>,
}

/// Folds one batch of events into `prev`, returning the new view.
///
/// Pure: the same `prev` and `events` always produce the same view.
pub fn merge_batch<T: LiveEntity>(
    config: &SyncConfig,
    prev: &LocalView<T>,
    events: Vec<ChangeEvent<T>>,
) -> MergeOutcome<T> {
    let mut stats = MergeStats::default();
    let mut rejected = Vec::new();

    let mut added: Vec<T> = Vec::new();
    let mut modified: Vec<T> = Vec::new();
    let mut removed_ids: HashSet<String> = HashSet::new();

    for event in events {
        if event.id().trim().is_empty() {
            let diagnostic = MalformedEvent::MissingId { kind: event.kind() };
            warn!("Dropping change event: {}", diagnostic);
            rejected.push(diagnostic);
            continue;
        }
        match event {
            ChangeEvent::Added(entity) => added.push(entity),
            ChangeEvent::Modified(entity) => modified.push(entity),
            ChangeEvent::Removed { id } => {
                removed_ids.insert(id);
            }
        }
    }
    stats.rejected = rejected.len();

    let mut entries: Vec<ViewEntry<T>> = prev
        .entries
        .iter()
        .filter(|entry| !removed_ids.contains(entry.entity.id()))
        .cloned()
        .collect();
    stats.removed = prev.entries.len() - entries.len();

    if !modified.is_empty() {
        let positions: HashMap<String, usize> = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.entity.id().to_string(), index))
            .collect();

        for entity in modified {
            match positions.get(entity.id()) {
                Some(&index) => {
                    entries[index].entity = entity;
                    stats.modified += 1;
                }
                None => {
                    debug!("Ignoring modification of untracked id '{}'", entity.id());
                    stats.ignored_modifications += 1;
                }
            }
        }
    }

    let existing_ids: HashSet<String> = entries
        .iter()
        .map(|entry| entry.entity.id().to_string())
        .collect();

    let mut next_seq = prev.next_seq;
    let mut fresh: Vec<ViewEntry<T>> = Vec::new();
    let mut fresh_positions: HashMap<String, usize> = HashMap::new();

    for entity in added {
        if existing_ids.contains(entity.id()) {
            stats.duplicate_adds += 1;
            continue;
        }

        let seq = next_seq;
        next_seq += 1;

        if let Some(&index) = fresh_positions.get(entity.id()) {
            warn!(
                "Id '{}' was added twice in one batch; keeping the later payload",
                entity.id()
            );
            fresh[index] = ViewEntry { seq, entity };
            stats.superseded_adds += 1;
            continue;
        }

        fresh_positions.insert(entity.id().to_string(), fresh.len());
        fresh.push(ViewEntry { seq, entity });
    }
    stats.added = fresh.len();
    entries.extend(fresh);

    sort_entries(&mut entries, config.order);

    if entries.len() > config.max_size {
        let overflow = entries.len() - config.max_size;
        match config.order {
            SortOrder::Ascending => {
                entries.drain(..overflow);
            }
            SortOrder::Descending => entries.truncate(config.max_size),
        }
        stats.evicted = overflow;
    }

    MergeOutcome {
        view: LocalView { entries, next_seq },
        stats,
        rejected,
    }
}

/// Sorts by order key, then by arrival sequence, both in `order`'s direction.
///
/// Descending therefore puts the latest arrival first among equal keys, and
/// a descending view is always the exact reverse of the ascending one.
fn sort_entries<T: LiveEntity>(entries: &mut [ViewEntry<T>], order: SortOrder) {
    entries.sort_by(|a, b| {
        let ascending = a
            .entity
            .order_key()
            .cmp(&b.entity.order_key())
            .then(a.seq.cmp(&b.seq));
        match order {
            SortOrder::Ascending => ascending,
            SortOrder::Descending => ascending.reverse(),
        }
    });
}

/// Keeps one live collection's view up to date, one batch at a time.
///
/// Not thread-safe by itself: callers apply batches from a single dispatch
/// context, in delivery order.
#[derive(Clone, Debug)]
pub struct LiveCollectionSynchronizer<T> {
    config: SyncConfig,
    view: Arc<LocalView<T>>,
}

impl<T: LiveEntity> LiveCollectionSynchronizer<T> {
    /// Fails with [`Error::InvalidConfig`] when `config` does not validate.
    pub fn new(config: SyncConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            view: Arc::new(LocalView::default()),
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn view(&self) -> &LocalView<T> {
        &self.view
    }

    /// Shared handle to the current view for readers on other tasks.
    pub fn snapshot(&self) -> Arc<LocalView<T>> {
        Arc::clone(&self.view)
    }

    /// Applies a batch of typed events and returns the new view.
    pub fn apply_batch(&mut self, events: Vec<ChangeEvent<T>>) -> &LocalView<T> {
        self.apply(events, Vec::new());
        &self.view
    }

    /// Decodes raw upstream changes, then applies the valid ones.
    pub fn apply_raw_batch(&mut self, changes: Vec<RawChange>) -> BatchReport
    where
        T: DeserializeOwned,
    {
        let (events, rejected) = decode_batch::<T>(changes);
        for diagnostic in &rejected {
            warn!("Dropping change event: {}", diagnostic);
        }
        self.apply(events, rejected)
    }

    /// Drops the current view, as a resubscription would.
    pub fn reset(&mut self) {
        self.view = Arc::new(LocalView::default());
    }

    fn apply(
        &mut self,
        events: Vec<ChangeEvent<T>>,
        mut rejected: Vec<MalformedEvent>,
    ) -> BatchReport {
        let MergeOutcome {
            view,
            mut stats,
            rejected: merge_rejected,
        } = merge_batch(&self.config, &self.view, events);

        rejected.extend(merge_rejected);
        stats.rejected = rejected.len();

        debug!(
            "Applied batch: {} added, {} modified, {} removed, {} evicted, {} rejected ({} in view)",
            stats.added,
            stats.modified,
            stats.removed,
            stats.evicted,
            stats.rejected,
            view.len()
        );

        self.view = Arc::new(view);
        BatchReport { stats, rejected }
    }
}
