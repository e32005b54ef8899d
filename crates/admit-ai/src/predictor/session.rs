use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::gateway::PredictionResults;
use super::request::PredictorRequest;

/// Identifier wrapper for predictor sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Cross-page predictor state for one visitor, replacing ambient UI context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictorSession {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_exam_id: Option<String>,
    pub last_request: Option<PredictorRequest>,
    pub last_results: Option<PredictionResults>,
}

impl PredictorSession {
    pub fn new(session_id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            created_at: now,
            updated_at: now,
            last_exam_id: None,
            last_request: None,
            last_results: None,
        }
    }

    pub fn record_prediction(
        &mut self,
        exam_id: &str,
        request: PredictorRequest,
        results: PredictionResults,
        now: DateTime<Utc>,
    ) {
        self.last_exam_id = Some(exam_id.to_string());
        self.last_request = Some(request);
        self.last_results = Some(results);
        self.updated_at = now;
    }
}

/// Storage abstraction so the pipeline service can be exercised in isolation.
pub trait SessionStore: Send + Sync {
    fn create(&self, session: PredictorSession) -> Result<PredictorSession, SessionError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<PredictorSession>, SessionError>;
    fn update(&self, session: PredictorSession) -> Result<(), SessionError>;
    fn clear(&self, id: &SessionId) -> Result<(), SessionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
