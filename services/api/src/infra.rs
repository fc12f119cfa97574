use credit_engine::config::AppConfig;
use credit_engine::error::AppError;
use credit_engine::intake::{InMemoryRateLimitStore, RateLimitPolicy, RateLimiter};
use credit_engine::scoring::{EngineConfig, ScoringEngine};
use credit_engine::CreditDecisionService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type DecisionService = CreditDecisionService<ScoringEngine, InMemoryRateLimitStore>;

/// Scoring engine and process-local rate limiter built from the loaded configuration.
pub(crate) fn decision_service(config: &AppConfig) -> Result<Arc<DecisionService>, AppError> {
    let engine = ScoringEngine::new(EngineConfig::standard().with_locale(config.scoring.locale))?;
    let limiter = RateLimiter::new(
        Arc::new(InMemoryRateLimitStore::default()),
        RateLimitPolicy::from(&config.rate_limit),
    );
    Ok(Arc::new(CreditDecisionService::new(
        Arc::new(engine),
        limiter,
    )))
}
