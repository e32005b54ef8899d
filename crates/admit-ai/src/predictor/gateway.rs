use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::request::PredictorRequest;

/// Per-college probability records returned by the prediction backend.
///
/// Records are passed through untouched; their shape belongs to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResults {
    #[serde(default)]
    pub results: Vec<Value>,
}

/// Outbound hook to the external predictor endpoint.
pub trait PredictionGateway: Send + Sync {
    fn predict(
        &self,
        request: &PredictorRequest,
    ) -> impl Future<Output = Result<PredictionResults, GatewayError>> + Send;
}

/// Failure talking to the prediction backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("prediction backend is not configured")]
    NotConfigured,
    #[error("prediction backend timed out")]
    Timeout,
    #[error("prediction backend rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("prediction backend unavailable ({status})")]
    Unavailable { status: u16 },
    #[error("prediction backend unreachable: {0}")]
    Transport(String),
    #[error("prediction backend returned an unreadable body: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Classify a non-success HTTP status from the backend.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            408 | 504 => GatewayError::Timeout,
            400..=499 => GatewayError::Rejected {
                status,
                message: message.into(),
            },
            _ => GatewayError::Unavailable { status },
        }
    }
}
