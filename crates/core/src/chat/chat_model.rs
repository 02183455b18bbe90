//! Chat domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::live::{timestamp, LiveEntity};

/// Room used when a message does not name one
pub const DEFAULT_ROOM: &str = "general-Chat";

/// Domain model representing a message in the shared chat room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
}

impl LiveEntity for ChatMessage {
    fn id(&self) -> &str {
        &self.id
    }

    fn order_key(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Input model for posting a chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChatMessage {
    pub room: Option<String>,
    pub username: String,
    pub message: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewChatMessage {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::Validation("username is required".to_string()));
        }
        if self.message.trim().is_empty() {
            return Err(Error::Validation("message cannot be blank".to_string()));
        }
        Ok(())
    }

    /// Builds the stored message; a missing timestamp means "sent now".
    pub fn into_message(self, id: String, now: DateTime<Utc>) -> Result<ChatMessage> {
        self.validate()?;
        Ok(ChatMessage {
            id,
            username: self.username.trim().to_string(),
            message: self.message,
            room: Some(self.room.unwrap_or_else(|| DEFAULT_ROOM.to_string())),
            timestamp: self.timestamp.unwrap_or(now),
        })
    }
}
