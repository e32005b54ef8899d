use crate::cli::ServeArgs;
use crate::infra::{AppState, HttpPredictionGateway, InMemorySessionStore};
use crate::routes::with_predictor_routes;
use admit_ai::config::AppConfig;
use admit_ai::error::AppError;
use admit_ai::predictor::{PredictorService, ScoreNormalizer};
use admit_ai::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let gateway = HttpPredictionGateway::from_config(&config.predictor).map_err(axum::Error::new)?;
    if gateway.endpoint().is_none() {
        warn!("PREDICTOR_UPSTREAM_URL not set; predictions will answer 503");
    }

    let normalizer = ScoreNormalizer::new(
        config.predictor.band_placement,
        config.predictor.jitter_seed,
    );
    let sessions = Arc::new(InMemorySessionStore::new(config.predictor.session_ttl));
    let predictor_service = Arc::new(PredictorService::new(
        Arc::new(gateway),
        sessions,
        normalizer,
    ));

    let app = with_predictor_routes(predictor_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        placement = ?config.predictor.band_placement,
        "admission predictor ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
