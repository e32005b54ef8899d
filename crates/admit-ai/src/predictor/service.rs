use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::ExamDefinition;
use super::error::{LookupError, ValidationError};
use super::gateway::{GatewayError, PredictionGateway, PredictionResults};
use super::normalizer::{NormalizationResult, ScoreNormalizer, ScoreSubmission};
use super::registry::ExamRegistry;
use super::request::{assemble, PredictorRequest};
use super::session::{PredictorSession, SessionError, SessionId, SessionStore};

/// Service composing the exam registry, normalizer, prediction gateway, and session store.
pub struct PredictorService<G, S> {
    registry: Arc<ExamRegistry>,
    normalizer: Arc<ScoreNormalizer>,
    gateway: Arc<G>,
    sessions: Arc<S>,
    in_flight: Arc<Mutex<HashSet<SessionId>>>,
}

/// Session ids are the only handle a visitor holds, so they carry 128 random bits.
fn next_session_id() -> SessionId {
    let token: u128 = rand::thread_rng().gen();
    SessionId(format!("ses-{token:032x}"))
}

/// Normalized rank for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedScore {
    pub exam_id: String,
    pub canonical_rank: u32,
}

/// Assembled request plus backend response for one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionOutcome {
    pub exam_id: String,
    pub request: PredictorRequest,
    pub results: Vec<serde_json::Value>,
}

impl<G, S> PredictorService<G, S>
where
    G: PredictionGateway + 'static,
    S: SessionStore + 'static,
{
    pub fn new(gateway: Arc<G>, sessions: Arc<S>, normalizer: ScoreNormalizer) -> Self {
        Self::with_registry(ExamRegistry::standard(), gateway, sessions, normalizer)
    }

    pub fn with_registry(
        registry: ExamRegistry,
        gateway: Arc<G>,
        sessions: Arc<S>,
        normalizer: ScoreNormalizer,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            normalizer: Arc::new(normalizer),
            gateway,
            sessions,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn registry(&self) -> &ExamRegistry {
        &self.registry
    }

    pub fn exam(&self, exam_id: &str) -> Result<&ExamDefinition, LookupError> {
        self.registry
            .get_exam(exam_id.trim())
            .ok_or_else(|| LookupError::ExamNotFound(exam_id.trim().to_string()))
    }

    /// Validate and convert a submission into its canonical rank.
    pub fn normalize(
        &self,
        submission: &ScoreSubmission,
    ) -> Result<NormalizedScore, PredictorError> {
        let (exam, result) = self.normalize_with_exam(submission)?;
        Ok(NormalizedScore {
            exam_id: exam.id.to_string(),
            canonical_rank: result.canonical_rank,
        })
    }

    /// Run validate -> normalize -> assemble without contacting the backend.
    pub fn assemble(
        &self,
        submission: &ScoreSubmission,
    ) -> Result<PredictorRequest, PredictorError> {
        let (exam, result) = self.normalize_with_exam(submission)?;
        let request = assemble(exam, &result, &submission.qualifiers)?;
        debug!(exam_id = exam.id, rank = request.rank, "predictor request assembled");
        Ok(request)
    }

    /// Full pipeline followed by the backend call.
    ///
    /// With a session, a second prediction for the same session is refused while one is in
    /// flight and the outcome is recorded on the session.
    pub async fn predict(
        &self,
        session_id: Option<&SessionId>,
        submission: &ScoreSubmission,
    ) -> Result<PredictionOutcome, PredictorError> {
        let request = self.assemble(submission)?;
        let exam_id = submission.exam_id.trim().to_string();

        let _guard = match session_id {
            Some(id) => {
                if self.sessions.fetch(id)?.is_none() {
                    return Err(SessionError::NotFound.into());
                }
                Some(InFlightGuard::acquire(&self.in_flight, id)?)
            }
            None => None,
        };

        let results = match self.gateway.predict(&request).await {
            Ok(results) => results,
            Err(err) => {
                warn!(exam_id = %exam_id, error = %err, "prediction backend call failed");
                return Err(err.into());
            }
        };

        info!(
            exam_id = %exam_id,
            rank = request.rank,
            colleges = results.results.len(),
            "prediction completed"
        );

        if let Some(id) = session_id {
            self.record_on_session(id, &exam_id, &request, &results);
        }

        Ok(PredictionOutcome {
            exam_id,
            request,
            results: results.results,
        })
    }

    pub fn start_session(&self) -> Result<PredictorSession, PredictorError> {
        let session = PredictorSession::new(next_session_id(), Utc::now());
        let stored = self.sessions.create(session)?;
        debug!(session_id = %stored.session_id.0, "predictor session created");
        Ok(stored)
    }

    pub fn session(&self, id: &SessionId) -> Result<PredictorSession, PredictorError> {
        let session = self.sessions.fetch(id)?.ok_or(SessionError::NotFound)?;
        Ok(session)
    }

    pub fn clear_session(&self, id: &SessionId) -> Result<(), PredictorError> {
        self.sessions.clear(id)?;
        debug!(session_id = %id.0, "predictor session cleared");
        Ok(())
    }

    fn normalize_with_exam(
        &self,
        submission: &ScoreSubmission,
    ) -> Result<(&ExamDefinition, NormalizationResult), PredictorError> {
        let exam = self.exam(&submission.exam_id)?;
        let input = submission.to_input()?;
        let result = self.normalizer.normalize(exam, &input)?;
        Ok((exam, result))
    }

    /// The session may have been cleared while the backend call was running; the outcome is
    /// still returned to the caller in that case.
    fn record_on_session(
        &self,
        id: &SessionId,
        exam_id: &str,
        request: &PredictorRequest,
        results: &PredictionResults,
    ) {
        let outcome = self.sessions.fetch(id).and_then(|session| {
            let mut session = session.ok_or(SessionError::NotFound)?;
            session.record_prediction(exam_id, request.clone(), results.clone(), Utc::now());
            self.sessions.update(session)
        });

        if let Err(err) = outcome {
            warn!(session_id = %id.0, error = %err, "could not record prediction on session");
        }
    }
}

/// Marks a session as having a prediction in flight until dropped.
struct InFlightGuard {
    in_flight: Arc<Mutex<HashSet<SessionId>>>,
    session_id: SessionId,
}

impl InFlightGuard {
    fn acquire(
        in_flight: &Arc<Mutex<HashSet<SessionId>>>,
        session_id: &SessionId,
    ) -> Result<Self, PredictorError> {
        let mut active = in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(session_id.clone()) {
            return Err(PredictorError::InFlight(session_id.0.clone()));
        }

        Ok(Self {
            in_flight: Arc::clone(in_flight),
            session_id: session_id.clone(),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut active = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        active.remove(&self.session_id);
    }
}

/// Error raised by the predictor service.
#[derive(Debug, thiserror::Error)]
pub enum PredictorError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("a prediction is already running for session {0}")]
    InFlight(String),
}
