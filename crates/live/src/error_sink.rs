//! Side channel for subscription failures.

use std::sync::{Arc, Mutex, PoisonError};

use log::warn;

use crate::source::SubscriptionError;

/// Receives subscription errors on behalf of the rendering layer.
///
/// # Design Rules
///
/// - `report()` must be fast and non-blocking
/// - Reporting never touches the live view; it stays at its last good state
pub trait SubscriptionErrorSink: Send + Sync {
    fn report(&self, collection: &str, error: &SubscriptionError);
}

/// Logs subscription errors as warnings.
#[derive(Clone, Default)]
pub struct LogErrorSink;

impl SubscriptionErrorSink for LogErrorSink {
    fn report(&self, collection: &str, error: &SubscriptionError) {
        warn!("Listener for '{}' reported an error: {}", collection, error);
    }
}

/// Discards every report.
#[derive(Clone, Default)]
pub struct NoOpErrorSink;

impl SubscriptionErrorSink for NoOpErrorSink {
    fn report(&self, _collection: &str, _error: &SubscriptionError) {}
}

/// Collects reports for inspection in tests.
#[derive(Clone, Default)]
pub struct MockErrorSink {
    reports: Arc<Mutex<Vec<(String, SubscriptionError)>>>,
}

impl MockErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected `(collection, error)` reports.
    pub fn reports(&self) -> Vec<(String, SubscriptionError)> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SubscriptionErrorSink for MockErrorSink {
    fn report(&self, collection: &str, error: &SubscriptionError) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((collection.to_string(), error.clone()));
    }
}
