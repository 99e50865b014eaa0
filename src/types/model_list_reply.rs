use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::ReplyStatus;

/// Wire shape of a `GET /api/models` response: every model name the
/// bridge can see in the selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelListReply {
    /// Success/error marker.
    pub status: ReplyStatus,

    /// Model names, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,

    /// Error message, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ModelListReply {
    /// Collapses the status envelope into the model list or an error.
    pub fn into_models(self) -> Result<Vec<String>> {
        if !self.status.is_success() {
            return Err(Error::backend(
                self.message
                    .unwrap_or_else(|| "unspecified bridge error".to_string()),
            ));
        }
        self.models.ok_or_else(|| {
            Error::serialization("model list reply marked success but missing models", None)
        })
    }
}
