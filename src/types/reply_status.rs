use serde::{Deserialize, Serialize};

/// Outcome marker carried by every bridge payload.
///
/// The bridge reports success or failure in-band: every JSON body has a
/// `status` field of `"success"` or `"error"`, independent of the HTTP
/// status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    /// The operation completed and the payload carries its result fields.
    Success,

    /// The operation failed and the payload carries a `message` field.
    Error,
}

impl ReplyStatus {
    /// Returns true for `ReplyStatus::Success`.
    pub fn is_success(&self) -> bool {
        matches!(self, ReplyStatus::Success)
    }
}
