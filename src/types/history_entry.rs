use serde::{Deserialize, Serialize};

/// One conversation summary from `GET /api/history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Conversation identifier, usable as a `chat_id`.
    pub id: String,

    /// Human-readable conversation title.
    pub title: String,
}
