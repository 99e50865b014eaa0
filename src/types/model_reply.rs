use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::ReplyStatus;

/// Wire shape of a `GET /api/model` response: the currently selected
/// model's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelReply {
    /// Success/error marker.
    pub status: ReplyStatus,

    /// Display name of the current model, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// Error message, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ModelReply {
    /// Collapses the status envelope into the model name or an error.
    pub fn into_name(self) -> Result<String> {
        if !self.status.is_success() {
            return Err(Error::backend(
                self.message
                    .unwrap_or_else(|| "unspecified bridge error".to_string()),
            ));
        }
        self.model_name.ok_or_else(|| {
            Error::serialization("model reply marked success but missing model_name", None)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_reply() {
        let json = serde_json::json!({ "status": "success", "model_name": "Qwen3-Plus" });
        let reply: ModelReply = serde_json::from_value(json).unwrap();
        assert_eq!(reply.into_name().unwrap(), "Qwen3-Plus");
    }
}
