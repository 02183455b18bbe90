//! Replays a JSON-lines capture of subscription traffic through one live
//! feed per collection.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::bail;
use referral_core::chat::ChatMessage;
use referral_core::jobs::{JobOpening, JobRequest, ListingFilter};
use referral_core::notifications::{unread_count, Notification};
use referral_core::{CollectionKind, LiveEntity, LocalView, RawChange};
use referral_live::{
    channel_source, FeedStatus, LiveFeed, LiveFeedHandle, SubscriptionError, SubscriptionErrorSink,
    SubscriptionMessage, SubscriptionPublisher,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::config::Config;

/// One line of a capture file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaptureLine {
    pub collection: String,
    #[serde(default)]
    pub changes: Option<Vec<RawChange>>,
    #[serde(default)]
    pub error: Option<SubscriptionError>,
}

impl CaptureLine {
    pub fn into_message(self) -> anyhow::Result<(CollectionKind, SubscriptionMessage)> {
        let kind = CollectionKind::from_str(&self.collection)?;
        let message = match (self.changes, self.error) {
            (Some(changes), None) => SubscriptionMessage::Batch(changes),
            (None, Some(error)) => SubscriptionMessage::Error(error),
            _ => bail!("capture line must carry exactly one of `changes` or `error`"),
        };
        Ok((kind, message))
    }
}

/// Final state of one feed after the capture is exhausted.
#[derive(Debug, Serialize)]
pub struct FeedReport<T> {
    pub status: FeedStatus,
    pub entries: Vec<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
    pub messages: FeedReport<ChatMessage>,
    pub job_requests: FeedReport<JobRequest>,
    pub job_openings: FeedReport<JobOpening>,
    pub notifications: FeedReport<Notification>,
    pub open_job_openings: usize,
    pub unread_notifications: usize,
    pub lines_dispatched: usize,
    pub lines_skipped: usize,
}

struct ReplayChannel<T> {
    publisher: Option<SubscriptionPublisher>,
    handle: LiveFeedHandle<T>,
}

impl<T: LiveEntity + DeserializeOwned> ReplayChannel<T> {
    fn open(
        kind: CollectionKind,
        window: usize,
        error_sink: Arc<dyn SubscriptionErrorSink>,
    ) -> anyhow::Result<Self> {
        let config = kind.config_with_window(window)?;
        let (publisher, source) = channel_source();
        let handle = LiveFeed::spawn(kind.collection_name(), config, source, error_sink)?;
        Ok(Self {
            publisher: Some(publisher),
            handle,
        })
    }

    /// Sends `message` to the feed. A terminal error also closes the
    /// subscription, so later lines for this collection are refused.
    fn publish(&mut self, message: SubscriptionMessage) -> bool {
        let terminal = matches!(&message, SubscriptionMessage::Error(error) if error.is_terminal());
        let published = match &self.publisher {
            Some(publisher) => publisher.publish(message).is_ok(),
            None => false,
        };
        if terminal {
            self.publisher = None;
        }
        published
    }

    /// Ends the subscription and waits for the feed to drain it.
    async fn finish(mut self) -> anyhow::Result<(FeedStatus, Arc<LocalView<T>>)> {
        drop(self.publisher.take());
        let status = self.handle.stopped().await;
        let view = self.handle.join().await?;
        Ok((status, view))
    }
}

fn report<T: LiveEntity>(status: FeedStatus, view: &LocalView<T>) -> FeedReport<T> {
    FeedReport {
        status,
        entries: view.to_vec(),
    }
}

/// The four live collections the platform renders.
pub struct ReplayFeeds {
    chat: ReplayChannel<ChatMessage>,
    job_requests: ReplayChannel<JobRequest>,
    job_openings: ReplayChannel<JobOpening>,
    notifications: ReplayChannel<Notification>,
}

impl ReplayFeeds {
    /// Spawns one feed per collection. Must run inside a tokio runtime.
    pub fn start(config: &Config, error_sink: Arc<dyn SubscriptionErrorSink>) -> anyhow::Result<Self> {
        Ok(Self {
            chat: ReplayChannel::open(CollectionKind::Chat, config.chat_window, error_sink.clone())?,
            job_requests: ReplayChannel::open(
                CollectionKind::JobRequests,
                config.listing_window,
                error_sink.clone(),
            )?,
            job_openings: ReplayChannel::open(
                CollectionKind::JobOpenings,
                config.listing_window,
                error_sink.clone(),
            )?,
            notifications: ReplayChannel::open(
                CollectionKind::Notifications,
                config.notification_window,
                error_sink,
            )?,
        })
    }

    /// Routes a message to its collection's feed. Returns false when that
    /// feed has already stopped.
    pub fn dispatch(&mut self, kind: CollectionKind, message: SubscriptionMessage) -> bool {
        match kind {
            CollectionKind::Chat => self.chat.publish(message),
            CollectionKind::JobRequests => self.job_requests.publish(message),
            CollectionKind::JobOpenings => self.job_openings.publish(message),
            CollectionKind::Notifications => self.notifications.publish(message),
        }
    }

    pub async fn finish(self, lines_dispatched: usize, lines_skipped: usize) -> anyhow::Result<ReplaySummary> {
        let (chat_status, chat) = self.chat.finish().await?;
        let (requests_status, requests) = self.job_requests.finish().await?;
        let (openings_status, openings) = self.job_openings.finish().await?;
        let (notifications_status, notifications) = self.notifications.finish().await?;

        Ok(ReplaySummary {
            open_job_openings: ListingFilter::new().open_only(true).count(&*openings),
            unread_notifications: unread_count(&*notifications),
            messages: report(chat_status, &*chat),
            job_requests: report(requests_status, &*requests),
            job_openings: report(openings_status, &*openings),
            notifications: report(notifications_status, &*notifications),
            lines_dispatched,
            lines_skipped,
        })
    }
}

/// Feeds every line of `reader` through fresh live feeds and returns their
/// final state. Unknown collections and unparseable lines are skipped.
pub async fn replay<R>(
    config: &Config,
    reader: R,
    error_sink: Arc<dyn SubscriptionErrorSink>,
) -> anyhow::Result<ReplaySummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut feeds = ReplayFeeds::start(config, error_sink)?;
    let mut lines = reader.lines();
    let mut line_number = 0usize;
    let mut dispatched = 0usize;
    let mut skipped = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }

        let parsed = serde_json::from_str::<CaptureLine>(&line)
            .map_err(anyhow::Error::from)
            .and_then(CaptureLine::into_message);
        let (kind, message) = match parsed {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Skipping capture line {}: {}", line_number, e);
                skipped += 1;
                continue;
            }
        };

        if feeds.dispatch(kind, message) {
            dispatched += 1;
        } else {
            tracing::warn!(
                "Skipping capture line {}: feed '{}' has stopped",
                line_number,
                kind
            );
            skipped += 1;
        }
    }

    tracing::debug!("Capture exhausted after {} lines", line_number);
    feeds.finish(dispatched, skipped).await
}
