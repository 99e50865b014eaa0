use serde::{Deserialize, Serialize};

/// Request body for `POST /api/image`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// Description of the image to generate.
    pub prompt: String,
}

impl ImageRequest {
    /// Creates a new image generation request.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}
