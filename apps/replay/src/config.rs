use std::path::PathBuf;

use referral_core::constants::{
    DEFAULT_CHAT_WINDOW, DEFAULT_LISTING_WINDOW, DEFAULT_NOTIFICATION_WINDOW,
};

pub struct Config {
    pub replay_file: PathBuf,
    pub chat_window: usize,
    /// Shared by job requests and job openings.
    pub listing_window: usize,
    pub notification_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            replay_file: PathBuf::from("./replay.jsonl"),
            chat_window: DEFAULT_CHAT_WINDOW,
            listing_window: DEFAULT_LISTING_WINDOW,
            notification_window: DEFAULT_NOTIFICATION_WINDOW,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let replay_file = std::env::var("REFERRAL_REPLAY_FILE")
            .unwrap_or_else(|_| "./replay.jsonl".into())
            .into();
        Self {
            replay_file,
            chat_window: window_from_env("REFERRAL_CHAT_WINDOW", DEFAULT_CHAT_WINDOW),
            listing_window: window_from_env("REFERRAL_LISTING_WINDOW", DEFAULT_LISTING_WINDOW),
            notification_window: window_from_env(
                "REFERRAL_NOTIFICATION_WINDOW",
                DEFAULT_NOTIFICATION_WINDOW,
            ),
        }
    }
}

fn window_from_env(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
