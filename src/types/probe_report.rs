use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::ReplyStatus;

/// Wire shape of a `POST /api/test_models` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelProbeReply {
    /// Success/error marker.
    pub status: ReplyStatus,

    /// Number of models that answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_count: Option<usize>,

    /// Number of models probed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tested: Option<usize>,

    /// Names of the models that answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_models: Option<Vec<String>>,

    /// Names of the models that failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_models: Option<Vec<String>>,

    /// Error message, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Outcome of probing a set of models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelProbeReport {
    /// Number of models that answered.
    pub working_count: usize,

    /// Number of models probed.
    pub total_tested: usize,

    /// Names of the models that answered.
    pub working_models: Vec<String>,

    /// Names of the models that failed.
    pub failed_models: Vec<String>,
}

impl ModelProbeReply {
    /// Collapses the status envelope into a [`ModelProbeReport`] or an
    /// error.
    pub fn into_report(self) -> Result<ModelProbeReport> {
        if !self.status.is_success() {
            return Err(Error::backend(
                self.message
                    .unwrap_or_else(|| "unspecified bridge error".to_string()),
            ));
        }
        match (self.working_count, self.total_tested) {
            (Some(working_count), Some(total_tested)) => Ok(ModelProbeReport {
                working_count,
                total_tested,
                working_models: self.working_models.unwrap_or_default(),
                failed_models: self.failed_models.unwrap_or_default(),
            }),
            _ => Err(Error::serialization(
                "probe reply marked success but missing counts",
                None,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_reply() {
        let json = serde_json::json!({
            "status": "success",
            "working_count": 2,
            "total_tested": 3,
            "working_models": ["Qwen3-Plus", "Qwen-Turbo"],
            "failed_models": ["Qwen-Audio"]
        });
        let reply: ModelProbeReply = serde_json::from_value(json).unwrap();
        let report = reply.into_report().unwrap();
        assert_eq!(report.working_count, 2);
        assert_eq!(report.total_tested, 3);
        assert_eq!(report.failed_models, vec!["Qwen-Audio"]);
    }
}
