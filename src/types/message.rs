use serde::{Deserialize, Serialize};

/// Who produced a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The user's own input, appended optimistically before dispatch.
    User,

    /// A successful bridge response.
    Assistant,

    /// A failed operation, rendered inline in the transcript.
    Error,
}

/// One entry in a conversation transcript.
///
/// Messages are immutable once appended: they are never edited or removed
/// except by clearing the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who produced the message.
    pub sender: Sender,

    /// Message text, or an image URL when `is_image` is set.
    pub content: String,

    /// Whether `content` is an image reference rather than text.
    pub is_image: bool,
}

impl Message {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            content: content.into(),
            is_image: false,
        }
    }

    /// Creates an assistant text message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            content: content.into(),
            is_image: false,
        }
    }

    /// Creates an assistant image message from an image URL.
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            content: url.into(),
            is_image: true,
        }
    }

    /// Creates an inline error message.
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Error,
            content: content.into(),
            is_image: false,
        }
    }
}
