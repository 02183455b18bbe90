pub mod config;
pub mod replay;
mod main_lib;

pub use main_lib::{init_tracing, TracingErrorSink};
pub use replay::{replay, CaptureLine, FeedReport, ReplayFeeds, ReplaySummary};
