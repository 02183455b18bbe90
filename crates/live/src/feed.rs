//! Live feeds: one background task per subscribed collection.
//!
//! A feed owns a [`LiveCollectionSynchronizer`], pulls messages from a
//! [`SubscriptionSource`] and publishes each new view through a `watch`
//! channel. Renderers hold a [`LiveFeedHandle`] and only ever see complete
//! views. Dropping or shutting down the handle detaches the subscription.

use std::sync::Arc;

use log::{debug, info, warn};
use referral_core::{LiveCollectionSynchronizer, LiveEntity, LocalView, SyncConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::error_sink::SubscriptionErrorSink;
use crate::source::{SubscriptionMessage, SubscriptionSource};

/// Lifecycle state of a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "camelCase")]
pub enum FeedStatus {
    Live,
    /// A transient error was reported; the view is stale but valid.
    Degraded(String),
    /// A terminal error ended the subscription.
    Failed(String),
    Closed,
}

impl FeedStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Live | Self::Degraded(_))
    }
}

/// State driven by the feed task.
pub struct LiveFeed<T> {
    name: String,
    synchronizer: LiveCollectionSynchronizer<T>,
    error_sink: Arc<dyn SubscriptionErrorSink>,
    view_tx: watch::Sender<Arc<LocalView<T>>>,
    status_tx: watch::Sender<FeedStatus>,
}

impl<T: LiveEntity + DeserializeOwned> LiveFeed<T> {
    /// Validates `config` and spawns the feed onto the current tokio runtime.
    pub fn spawn<S>(
        name: impl Into<String>,
        config: SyncConfig,
        source: S,
        error_sink: Arc<dyn SubscriptionErrorSink>,
    ) -> Result<LiveFeedHandle<T>>
    where
        S: SubscriptionSource + 'static,
    {
        let synchronizer = LiveCollectionSynchronizer::new(config)?;
        let name = name.into();
        let (view_tx, view_rx) = watch::channel(synchronizer.snapshot());
        let (status_tx, status_rx) = watch::channel(FeedStatus::Live);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let feed = LiveFeed {
            name: name.clone(),
            synchronizer,
            error_sink,
            view_tx,
            status_tx,
        };
        let task = tokio::spawn(feed.run(source, shutdown_rx));

        Ok(LiveFeedHandle {
            id: Uuid::new_v4(),
            name,
            view_rx,
            status_rx,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    /// Consumes messages until the source ends, a terminal error arrives or
    /// shutdown is requested. Returns the last view.
    async fn run<S>(
        mut self,
        mut source: S,
        mut shutdown: oneshot::Receiver<()>,
    ) -> Arc<LocalView<T>>
    where
        S: SubscriptionSource,
    {
        info!("Live feed '{}' started", self.name);

        loop {
            let message = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    debug!("Live feed '{}' detached", self.name);
                    self.status_tx.send_replace(FeedStatus::Closed);
                    break;
                }
                message = source.next_message() => message,
            };

            match message {
                Some(message) => {
                    if let Some(final_status) = self.handle_message(message) {
                        self.status_tx.send_replace(final_status);
                        break;
                    }
                }
                None => {
                    info!("Subscription for '{}' ended", self.name);
                    self.status_tx.send_replace(FeedStatus::Closed);
                    break;
                }
            }
        }

        self.synchronizer.snapshot()
    }

    /// Applies one message. Returns the final status when the feed must stop.
    fn handle_message(&mut self, message: SubscriptionMessage) -> Option<FeedStatus> {
        match message {
            SubscriptionMessage::Batch(changes) => {
                if changes.is_empty() {
                    return None;
                }
                self.status_tx.send_if_modified(|status| {
                    if *status == FeedStatus::Live {
                        return false;
                    }
                    *status = FeedStatus::Live;
                    true
                });
                let report = self.synchronizer.apply_raw_batch(changes);
                if !report.stats.is_noop() {
                    self.view_tx.send_replace(self.synchronizer.snapshot());
                }
                None
            }
            SubscriptionMessage::Error(error) => {
                self.error_sink.report(&self.name, &error);
                if error.is_terminal() {
                    warn!("Live feed '{}' stopped: {}", self.name, error);
                    return Some(FeedStatus::Failed(error.to_string()));
                }
                self.status_tx
                    .send_replace(FeedStatus::Degraded(error.to_string()));
                None
            }
        }
    }
}

/// Renderer-side handle to a running feed.
pub struct LiveFeedHandle<T> {
    id: Uuid,
    name: String,
    view_rx: watch::Receiver<Arc<LocalView<T>>>,
    status_rx: watch::Receiver<FeedStatus>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Arc<LocalView<T>>>>,
}

impl<T: LiveEntity> LiveFeedHandle<T> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latest published view.
    pub fn view(&self) -> Arc<LocalView<T>> {
        self.view_rx.borrow().clone()
    }

    /// New receiver for view updates; each renderer gets its own.
    pub fn subscribe(&self) -> watch::Receiver<Arc<LocalView<T>>> {
        self.view_rx.clone()
    }

    pub fn status(&self) -> FeedStatus {
        self.status_rx.borrow().clone()
    }

    /// Waits until the feed is no longer running and returns why.
    pub async fn stopped(&mut self) -> FeedStatus {
        match self.status_rx.wait_for(|status| !status.is_running()).await {
            Ok(status) => status.clone(),
            Err(_) => FeedStatus::Closed,
        }
    }

    /// Waits for the next published view.
    pub async fn changed(&mut self) -> Result<Arc<LocalView<T>>> {
        self.view_rx
            .changed()
            .await
            .map_err(|_| Error::FeedClosed(self.name.clone()))?;
        Ok(self.view_rx.borrow_and_update().clone())
    }

    /// Detaches the subscription and returns the last view.
    pub async fn shutdown(mut self) -> Result<Arc<LocalView<T>>> {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            // The task may already have exited on its own.
            let _ = shutdown_tx.send(());
        }
        self.join_task().await
    }

    /// Waits for the feed to stop on its own (source ended or terminal
    /// error) and returns the last view.
    pub async fn join(mut self) -> Result<Arc<LocalView<T>>> {
        let _keep_attached = self.shutdown_tx.take();
        self.join_task().await
    }

    async fn join_task(&mut self) -> Result<Arc<LocalView<T>>> {
        match self.task.take() {
            Some(task) => task
                .await
                .map_err(|e| Error::FeedPanicked(e.to_string())),
            None => Ok(self.view()),
        }
    }
}
