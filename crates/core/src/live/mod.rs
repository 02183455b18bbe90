//! Live collections - change events, decoding, and the bounded view
//! synchronizer shared by chat, listings, and notifications.

mod change_event;
mod collections;
mod decode;
mod entity;
mod synchronizer;
pub mod timestamp;
mod view;

pub use change_event::{ChangeEvent, ChangeKind, RawChange};
pub use collections::CollectionKind;
pub use decode::{decode_batch, decode_change};
pub use entity::LiveEntity;
pub use synchronizer::{
    merge_batch, BatchReport, LiveCollectionSynchronizer, MergeOutcome, MergeStats, SortOrder,
    SyncConfig,
};
pub use view::{LocalView, ViewEntry};
