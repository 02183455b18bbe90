//! Referral Core - domain entities and live collection synchronization.
//!
//! This crate performs no I/O. Subscriptions, transport, and rendering live
//! in the hosts; they hand batches of change events to a
//! [`live::LiveCollectionSynchronizer`] and read back bounded, ordered views.

pub mod chat;
pub mod constants;
pub mod errors;
pub mod jobs;
pub mod live;
pub mod notifications;

// Re-export the live view API used by every host
pub use live::{
    ChangeEvent, ChangeKind, CollectionKind, LiveCollectionSynchronizer, LiveEntity, LocalView,
    RawChange, SortOrder, SyncConfig,
};

// Re-export error types
pub use errors::Error;
pub use errors::MalformedEvent;
pub use errors::Result;
