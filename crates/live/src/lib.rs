//! Async plumbing that keeps referral-core live views in step with a
//! subscription.

pub mod error;
pub mod error_sink;
pub mod feed;
pub mod source;

pub use error::{Error, Result};
pub use error_sink::{LogErrorSink, MockErrorSink, NoOpErrorSink, SubscriptionErrorSink};
pub use feed::{FeedStatus, LiveFeed, LiveFeedHandle};
pub use source::{
    channel_source, ChannelSource, SubscriptionError, SubscriptionMessage, SubscriptionPublisher,
    SubscriptionSource,
};
