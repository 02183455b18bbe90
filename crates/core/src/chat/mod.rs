//! Chat module - the shared room's message model.

mod chat_model;

pub use chat_model::{ChatMessage, NewChatMessage, DEFAULT_ROOM};
