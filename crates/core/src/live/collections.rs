//! The live collections the board subscribes to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{SortOrder, SyncConfig};
use crate::constants::{
    CHAT_COLLECTION, DEFAULT_CHAT_WINDOW, DEFAULT_LISTING_WINDOW, DEFAULT_NOTIFICATION_WINDOW,
    JOB_OPENINGS_COLLECTION, JOB_REQUESTS_COLLECTION, NOTIFICATIONS_COLLECTION,
};
use crate::errors::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectionKind {
    Chat,
    JobRequests,
    JobOpenings,
    Notifications,
}

impl CollectionKind {
    pub fn all() -> [CollectionKind; 4] {
        [
            Self::Chat,
            Self::JobRequests,
            Self::JobOpenings,
            Self::Notifications,
        ]
    }

    /// Name of the upstream collection.
    pub fn collection_name(&self) -> &'static str {
        match self {
            Self::Chat => CHAT_COLLECTION,
            Self::JobRequests => JOB_REQUESTS_COLLECTION,
            Self::JobOpenings => JOB_OPENINGS_COLLECTION,
            Self::Notifications => NOTIFICATIONS_COLLECTION,
        }
    }

    /// Document field the upstream query orders by.
    pub fn order_field(&self) -> &'static str {
        match self {
            Self::Chat => "timestamp",
            _ => "createdAt",
        }
    }

    pub fn sort_order(&self) -> SortOrder {
        match self {
            Self::Chat => SortOrder::Ascending,
            _ => SortOrder::Descending,
        }
    }

    pub fn default_window(&self) -> usize {
        match self {
            Self::Chat => DEFAULT_CHAT_WINDOW,
            Self::JobRequests | Self::JobOpenings => DEFAULT_LISTING_WINDOW,
            Self::Notifications => DEFAULT_NOTIFICATION_WINDOW,
        }
    }

    pub fn default_config(&self) -> SyncConfig {
        SyncConfig {
            max_size: self.default_window(),
            order: self.sort_order(),
        }
    }

    /// Config with a caller-supplied window and this collection's order.
    pub fn config_with_window(&self, max_size: usize) -> crate::Result<SyncConfig> {
        SyncConfig::new(max_size, self.sort_order())
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_name())
    }
}

impl FromStr for CollectionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|kind| kind.collection_name() == s)
            .ok_or_else(|| Error::UnknownCollection(s.to_string()))
    }
}
