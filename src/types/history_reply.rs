use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{HistoryEntry, ReplyStatus};

/// Wire shape of a `GET /api/history` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryReply {
    /// Success/error marker.
    pub status: ReplyStatus,

    /// Conversation summaries, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<HistoryEntry>>,

    /// Error message, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HistoryReply {
    /// Collapses the status envelope into the summaries or an error.
    pub fn into_entries(self) -> Result<Vec<HistoryEntry>> {
        if !self.status.is_success() {
            return Err(Error::backend(
                self.message
                    .unwrap_or_else(|| "unspecified bridge error".to_string()),
            ));
        }
        self.history.ok_or_else(|| {
            Error::serialization("history reply marked success but missing history", None)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_reply() {
        let json = serde_json::json!({
            "status": "success",
            "history": [
                { "id": "c-1", "title": "First chat" },
                { "id": "c-2", "title": "Second chat" }
            ]
        });
        let reply: HistoryReply = serde_json::from_value(json).unwrap();
        let entries = reply.into_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "c-1");
    }
}
