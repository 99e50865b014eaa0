use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::ReplyStatus;

/// Wire shape of a `POST /api/chat` response.
///
/// Success payloads carry `chat_id` and `response`; error payloads carry
/// `message`. Use [`ChatReply::into_exchange`] to collapse the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Success/error marker.
    pub status: ReplyStatus,

    /// Conversation identifier, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,

    /// Assistant response text, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    /// Error message, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A successful chat exchange: the assistant's text and the conversation
/// it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatExchange {
    /// The conversation identifier assigned or confirmed by the bridge.
    pub chat_id: String,

    /// The assistant's response text.
    pub response: String,
}

impl ChatReply {
    /// Collapses the status envelope into a [`ChatExchange`] or an error.
    pub fn into_exchange(self) -> Result<ChatExchange> {
        if !self.status.is_success() {
            return Err(Error::backend(
                self.message
                    .unwrap_or_else(|| "unspecified bridge error".to_string()),
            ));
        }
        match (self.chat_id, self.response) {
            (Some(chat_id), Some(response)) => Ok(ChatExchange { chat_id, response }),
            _ => Err(Error::serialization(
                "chat reply marked success but missing chat_id or response",
                None,
            )),
        }
    }
}
