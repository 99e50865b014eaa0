use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::ReplyStatus;

/// Wire shape of a `POST /api/image` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReply {
    /// Success/error marker.
    pub status: ReplyStatus,

    /// Conversation identifier, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,

    /// URL of the generated image, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Error message, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A successful image exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageExchange {
    /// The conversation identifier assigned or confirmed by the bridge.
    pub chat_id: String,

    /// URL of the generated image.
    pub image_url: String,
}

impl ImageReply {
    /// Collapses the status envelope into an [`ImageExchange`] or an error.
    pub fn into_exchange(self) -> Result<ImageExchange> {
        if !self.status.is_success() {
            return Err(Error::backend(
                self.message
                    .unwrap_or_else(|| "unspecified bridge error".to_string()),
            ));
        }
        match (self.chat_id, self.image_url) {
            (Some(chat_id), Some(image_url)) => Ok(ImageExchange { chat_id, image_url }),
            _ => Err(Error::serialization(
                "image reply marked success but missing chat_id or image_url",
                None,
            )),
        }
    }
}
