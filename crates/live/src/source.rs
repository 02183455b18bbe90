//! Subscription sources feeding a live view.
//!
//! A source yields batches of raw changes in delivery order, or an error.
//! The end of the stream (`None`) means the subscription is gone. The
//! channel-backed source here is what in-process producers and tests use;
//! transport adapters implement [`SubscriptionSource`] directly.

use async_trait::async_trait;
use referral_core::RawChange;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::error::{Error, Result};

/// Failure reported by the upstream subscription.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum SubscriptionError {
    /// Connectivity lost; the upstream keeps retrying on its own.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The upstream cancelled the listener.
    #[error("subscription cancelled")]
    Cancelled,

    #[error("upstream error: {0}")]
    Internal(String),
}

impl SubscriptionError {
    /// Terminal errors end the subscription; others are reported and the
    /// feed keeps listening.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::PermissionDenied(_) | Self::Cancelled)
    }
}

/// One unit of delivery from a subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionMessage {
    /// Changes observed together in one update cycle. May be empty.
    Batch(Vec<RawChange>),
    Error(SubscriptionError),
}

/// Source of subscription messages for a single live query.
#[async_trait]
pub trait SubscriptionSource: Send {
    /// Next message, or `None` once the subscription has ended.
    async fn next_message(&mut self) -> Option<SubscriptionMessage>;
}

/// Receiving half of an in-process subscription channel.
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<SubscriptionMessage>,
}

#[async_trait]
impl SubscriptionSource for ChannelSource {
    async fn next_message(&mut self) -> Option<SubscriptionMessage> {
        self.rx.recv().await
    }
}

/// Sending half of an in-process subscription channel.
///
/// The subscription ends when every publisher has been dropped.
#[derive(Clone)]
pub struct SubscriptionPublisher {
    tx: mpsc::UnboundedSender<SubscriptionMessage>,
}

impl SubscriptionPublisher {
    pub fn publish(&self, message: SubscriptionMessage) -> Result<()> {
        self.tx.send(message).map_err(|_| Error::SourceClosed)
    }

    pub fn publish_batch(&self, changes: Vec<RawChange>) -> Result<()> {
        self.publish(SubscriptionMessage::Batch(changes))
    }

    pub fn publish_error(&self, error: SubscriptionError) -> Result<()> {
        self.publish(SubscriptionMessage::Error(error))
    }

    /// True once the consuming feed has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Ends the subscription from this publisher's side.
    pub fn close(self) {
        drop(self);
    }
}

/// Creates a connected publisher/source pair.
pub fn channel_source() -> (SubscriptionPublisher, ChannelSource) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SubscriptionPublisher { tx }, ChannelSource { rx })
}
