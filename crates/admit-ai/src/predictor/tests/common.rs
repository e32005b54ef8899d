use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};
use tokio::sync::Notify;

use crate::predictor::domain::InputKind;
use crate::predictor::gateway::{GatewayError, PredictionGateway, PredictionResults};
use crate::predictor::normalizer::{BandPlacement, QualifierValues, ScoreNormalizer, ScoreSubmission};
use crate::predictor::request::PredictorRequest;
use crate::predictor::service::PredictorService;
use crate::predictor::session::{PredictorSession, SessionError, SessionId, SessionStore};
use crate::predictor::predictor_router;

pub(super) fn jee_main_submission() -> ScoreSubmission {
    ScoreSubmission::new("jee-main", InputKind::Percentile, 99.5).with_qualifiers(
        QualifierValues {
            category: Some("OBC".to_string()),
            gender: Some("Male".to_string()),
            home_state: Some("Rajasthan".to_string()),
            preferred_branches: vec!["Computer Science".to_string()],
            ..QualifierValues::default()
        },
    )
}

pub(super) fn ts_eamcet_submission() -> ScoreSubmission {
    ScoreSubmission::new("ts-eamcet", InputKind::Rank, 2_350.0).with_qualifiers(
        QualifierValues {
            category: Some("General".to_string()),
            gender: Some("Female".to_string()),
            local_region: Some("OU".to_string()),
            ..QualifierValues::default()
        },
    )
}

pub(super) fn college_results() -> PredictionResults {
    PredictionResults {
        results: vec![
            json!({ "college": "NIT Trichy", "branch": "CSE", "probability": 0.62 }),
            json!({ "college": "NIT Warangal", "branch": "ECE", "probability": 0.81 }),
        ],
    }
}

pub(super) fn build_service() -> (
    PredictorService<StubGateway, MemorySessions>,
    Arc<StubGateway>,
    Arc<MemorySessions>,
) {
    let gateway = Arc::new(StubGateway::answering(college_results()));
    let sessions = Arc::new(MemorySessions::default());
    let service = PredictorService::new(
        gateway.clone(),
        sessions.clone(),
        ScoreNormalizer::new(BandPlacement::Midpoint, None),
    );
    (service, gateway, sessions)
}

pub(super) fn service_with_gateway<G: PredictionGateway + 'static>(
    gateway: Arc<G>,
) -> PredictorService<G, MemorySessions> {
    PredictorService::new(
        gateway,
        Arc::new(MemorySessions::default()),
        ScoreNormalizer::default(),
    )
}

pub(super) struct StubGateway {
    response: Result<PredictionResults, GatewayError>,
    requests: Mutex<Vec<PredictorRequest>>,
}

impl StubGateway {
    pub(super) fn answering(results: PredictionResults) -> Self {
        Self {
            response: Ok(results),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn failing(error: GatewayError) -> Self {
        Self {
            response: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn requests(&self) -> Vec<PredictorRequest> {
        self.requests.lock().expect("gateway mutex poisoned").clone()
    }
}

impl PredictionGateway for StubGateway {
    async fn predict(
        &self,
        request: &PredictorRequest,
    ) -> Result<PredictionResults, GatewayError> {
        self.requests
            .lock()
            .expect("gateway mutex poisoned")
            .push(request.clone());
        self.response.clone()
    }
}

/// Holds every call open until `release` is invoked.
#[derive(Default)]
pub(super) struct HeldGateway {
    release: Notify,
    calls: AtomicUsize,
}

impl HeldGateway {
    pub(super) fn release(&self) {
        self.release.notify_waiters();
        self.release.notify_one();
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PredictionGateway for HeldGateway {
    async fn predict(
        &self,
        _request: &PredictorRequest,
    ) -> Result<PredictionResults, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        Ok(college_results())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySessions {
    pub(super) sessions: Arc<Mutex<HashMap<SessionId, PredictorSession>>>,
}

impl SessionStore for MemorySessions {
    fn create(&self, session: PredictorSession) -> Result<PredictorSession, SessionError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(&session.session_id) {
            return Err(SessionError::Conflict);
        }
        guard.insert(session.session_id.clone(), session.clone());
        Ok(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<PredictorSession>, SessionError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, session: PredictorSession) -> Result<(), SessionError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if !guard.contains_key(&session.session_id) {
            return Err(SessionError::NotFound);
        }
        guard.insert(session.session_id.clone(), session);
        Ok(())
    }

    fn clear(&self, id: &SessionId) -> Result<(), SessionError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(SessionError::NotFound)
    }
}

pub(super) struct UnavailableSessions;

impl SessionStore for UnavailableSessions {
    fn create(&self, _session: PredictorSession) -> Result<PredictorSession, SessionError> {
        Err(SessionError::Unavailable("cache offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<PredictorSession>, SessionError> {
        Err(SessionError::Unavailable("cache offline".to_string()))
    }

    fn update(&self, _session: PredictorSession) -> Result<(), SessionError> {
        Err(SessionError::Unavailable("cache offline".to_string()))
    }

    fn clear(&self, _id: &SessionId) -> Result<(), SessionError> {
        Err(SessionError::Unavailable("cache offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(
    service: PredictorService<StubGateway, MemorySessions>,
) -> axum::Router {
    predictor_router(Arc::new(service))
}
