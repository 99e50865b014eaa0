use serde::{Deserialize, Serialize};

/// Request body for `POST /api/test_models`: send one short prompt
/// through each named model and report which ones answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelProbeRequest {
    /// Prompt sent to every model under test.
    pub prompt: String,

    /// Model names to probe.
    pub models: Vec<String>,
}

impl ModelProbeRequest {
    /// Creates a new probe request.
    pub fn new(prompt: impl Into<String>, models: Vec<String>) -> Self {
        Self {
            prompt: prompt.into(),
            models,
        }
    }
}
