use admit_ai::config::PredictorConfig;
use admit_ai::predictor::{
    GatewayError, PredictionGateway, PredictionResults, PredictorRequest, PredictorSession,
    SessionError, SessionId, SessionStore,
};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session store; sessions idle longer than `ttl` are treated as gone.
#[derive(Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, PredictorSession>>>,
    ttl: Duration,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(PredictorConfig::default().session_ttl)
    }
}

impl InMemorySessionStore {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<SessionId, PredictorSession>>, SessionError>
    {
        self.sessions
            .lock()
            .map_err(|_| SessionError::Unavailable("session mutex poisoned".to_string()))
    }

    fn is_expired(&self, session: &PredictorSession, now: DateTime<Utc>) -> bool {
        // clock skew can put updated_at in the future; that counts as fresh
        let idle = (now - session.updated_at).to_std().unwrap_or(Duration::ZERO);
        idle > self.ttl
    }

    /// Drops the entry for `id` if it has expired, returning whether it is still live.
    fn retain_live(
        &self,
        guard: &mut HashMap<SessionId, PredictorSession>,
        id: &SessionId,
    ) -> bool {
        let now = Utc::now();
        match guard.get(id) {
            Some(session) if self.is_expired(session, now) => {
                guard.remove(id);
                debug!(session_id = %id.0, "predictor session expired");
                false
            }
            Some(_) => true,
            None => false,
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, session: PredictorSession) -> Result<PredictorSession, SessionError> {
        let mut guard = self.lock()?;
        let now = Utc::now();
        let before = guard.len();
        guard.retain(|_, existing| !self.is_expired(existing, now));
        if guard.len() < before {
            debug!(purged = before - guard.len(), "expired predictor sessions purged");
        }

        if guard.contains_key(&session.session_id) {
            return Err(SessionError::Conflict);
        }
        guard.insert(session.session_id.clone(), session.clone());
        Ok(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<PredictorSession>, SessionError> {
        let mut guard = self.lock()?;
        if !self.retain_live(&mut guard, id) {
            return Ok(None);
        }
        Ok(guard.get(id).cloned())
    }

    fn update(&self, session: PredictorSession) -> Result<(), SessionError> {
        let mut guard = self.lock()?;
        if !self.retain_live(&mut guard, &session.session_id) {
            return Err(SessionError::NotFound);
        }
        guard.insert(session.session_id.clone(), session);
        Ok(())
    }

    fn clear(&self, id: &SessionId) -> Result<(), SessionError> {
        let mut guard = self.lock()?;
        if !self.retain_live(&mut guard, id) {
            return Err(SessionError::NotFound);
        }
        guard.remove(id);
        Ok(())
    }
}

const PREDICTOR_PATH: &str = "/api/predictor";

/// Forwards assembled requests to the external prediction backend over HTTP.
#[derive(Clone)]
pub(crate) struct HttpPredictionGateway {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl HttpPredictionGateway {
    pub(crate) fn from_config(config: &PredictorConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .user_agent(concat!("admit-ai/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config
                .upstream_url
                .as_ref()
                .map(|base| format!("{base}{PREDICTOR_PATH}")),
        })
    }

    pub(crate) fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

impl PredictionGateway for HttpPredictionGateway {
    async fn predict(
        &self,
        request: &PredictorRequest,
    ) -> Result<PredictionResults, GatewayError> {
        let endpoint = self.endpoint.as_deref().ok_or(GatewayError::NotConfigured)?;
        debug!(%endpoint, rank = request.rank, "calling prediction backend");

        let response = self
            .client
            .post(endpoint)
            .json(request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::from_status(status.as_u16(), message));
        }

        response
            .json::<PredictionResults>()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::Decode(err.to_string())
                }
            })
    }
}

fn classify_transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(err.to_string())
    }
}
