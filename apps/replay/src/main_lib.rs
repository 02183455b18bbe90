use referral_live::{SubscriptionError, SubscriptionErrorSink};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_tracing() {
    let log_format = std::env::var("REFERRAL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Reports subscription errors as structured tracing events.
#[derive(Clone, Default)]
pub struct TracingErrorSink;

impl SubscriptionErrorSink for TracingErrorSink {
    fn report(&self, collection: &str, error: &SubscriptionError) {
        tracing::warn!(
            collection,
            terminal = error.is_terminal(),
            "Subscription error: {}",
            error
        );
    }
}
