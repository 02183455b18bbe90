use chrono::{DateTime, Utc};

/// Identity and ordering contract for anything kept in a live view.
///
/// `id` must be stable for the lifetime of the upstream document.
/// `order_key` is the field the upstream query is ordered by (a message
/// timestamp, a listing's creation time).
pub trait LiveEntity: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
    fn order_key(&self) -> DateTime<Utc>;
}
