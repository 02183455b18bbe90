//! Change event types delivered by live-query subscriptions.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::LiveEntity;

/// Kind of change the upstream listener observed for a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change as it comes off the wire: document id plus raw document fields.
///
/// Nothing is validated here. Decoding into a typed [`ChangeEvent`] happens in
/// [`decode_change`](super::decode_change).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawChange {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl RawChange {
    pub fn added(id: impl Into<String>, data: Value) -> Self {
        Self {
            kind: ChangeKind::Added,
            id: Some(id.into()),
            data: Some(data),
        }
    }

    pub fn modified(id: impl Into<String>, data: Value) -> Self {
        Self {
            kind: ChangeKind::Modified,
            id: Some(id.into()),
            data: Some(data),
        }
    }

    pub fn removed(id: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Removed,
            id: Some(id.into()),
            data: None,
        }
    }
}

/// A decoded change for entity type `T`.
#[derive(Clone, Debug, PartialEq)]
pub enum ChangeEvent<T> {
    /// A document entered the query result.
    Added(T),
    /// A document already in the result changed; carries the full new payload.
    Modified(T),
    /// A document left the query result.
    Removed { id: String },
}

impl<T: LiveEntity> ChangeEvent<T> {
    pub fn removed(id: impl Into<String>) -> Self {
        Self::Removed { id: id.into() }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Added(_) => ChangeKind::Added,
            Self::Modified(_) => ChangeKind::Modified,
            Self::Removed { .. } => ChangeKind::Removed,
        }
    }

    /// Id of the entity this event refers to.
    pub fn id(&self) -> &str {
        match self {
            Self::Added(entity) | Self::Modified(entity) => entity.id(),
            Self::Removed { id } => id.as_str(),
        }
    }
}
