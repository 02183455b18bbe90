//! The bounded, ordered, duplicate-free snapshot handed to renderers.

use serde::{Serialize, Serializer};

use super::LiveEntity;

/// One slot of a [`LocalView`].
///
/// `seq` is the arrival sequence number assigned when the entity was first
/// added. It survives modifications and is the tie-break when two entities
/// share an order key.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewEntry<T> {
    pub seq: u64,
    pub entity: T,
}

/// Derived, read-only view of a live collection.
///
/// A view is never patched in place by readers: every applied batch produces
/// a new one. Invariants (unique ids, sorted, bounded) are upheld by the
/// synchronizer that builds it.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalView<T> {
    pub(crate) entries: Vec<ViewEntry<T>>,
    pub(crate) next_seq: u64,
}

impl<T> Default for LocalView<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<T: LiveEntity> LocalView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entities in display order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().map(|entry| &entry.entity)
    }

    pub fn entries(&self) -> &[ViewEntry<T>] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.iter().find(|entity| entity.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn first(&self) -> Option<&T> {
        self.entries.first().map(|entry| &entry.entity)
    }

    pub fn last(&self) -> Option<&T> {
        self.entries.last().map(|entry| &entry.entity)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(|entity| entity.id()).collect()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: Serialize> Serialize for LocalView<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter().map(|entry| &entry.entity))
    }
}
