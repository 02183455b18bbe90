use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The feed consuming this source has stopped listening.
    #[error("Subscription source is closed")]
    SourceClosed,

    /// The feed task has exited; no further views will be published.
    #[error("Live feed '{0}' is closed")]
    FeedClosed(String),

    #[error("Live feed task failed: {0}")]
    FeedPanicked(String),

    #[error(transparent)]
    Core(#[from] referral_core::Error),
}
