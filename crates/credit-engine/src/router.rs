use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde_json::{json, Value};
use tracing::debug;

use crate::intake::RateLimitStore;
use crate::scoring::CreditScorer;
use crate::service::{CreditDecisionService, DecisionServiceError};

const ANONYMOUS_CLIENT: &str = "anonymous";

/// Router builder exposing the credit evaluation endpoints.
pub fn credit_router<S, L>(service: Arc<CreditDecisionService<S, L>>) -> Router
where
    S: CreditScorer + 'static,
    L: RateLimitStore + 'static,
{
    Router::new()
        .route("/api/v1/credit/evaluate", post(evaluate_handler::<S, L>))
        .route("/api/v1/system/info", get(system_info_handler::<S, L>))
        .with_state(service)
}

/// First `x-forwarded-for` hop, then `x-real-ip`, else a shared anonymous bucket.
pub(crate) fn client_id(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or(ANONYMOUS_CLIENT)
        .to_string()
}

fn error_envelope(status: StatusCode, error: String) -> Response {
    let payload = json!({
        "decision": "ERROR",
        "error": error,
        "timestamp": Local::now().naive_local(),
    });
    (status, Json(payload)).into_response()
}

pub(crate) async fn evaluate_handler<S, L>(
    State(service): State<Arc<CreditDecisionService<S, L>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    S: CreditScorer + 'static,
    L: RateLimitStore + 'static,
{
    let client = client_id(&headers);

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            debug!(client_id = %client, error = %err, "rejecting unparseable credit payload");
            return error_envelope(StatusCode::BAD_REQUEST, format!("Geçersiz JSON: {err}"));
        }
    };

    match service.evaluate(&client, &payload) {
        Ok(decision) => (StatusCode::OK, Json(decision)).into_response(),
        Err(DecisionServiceError::Malformed(message)) => {
            error_envelope(StatusCode::BAD_REQUEST, message)
        }
        Err(DecisionServiceError::Invalid(issues)) => {
            let errors: Vec<String> = issues.iter().map(ToString::to_string).collect();
            let payload = json!({
                "error": "Geçersiz başvuru verisi",
                "errors": errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(DecisionServiceError::RateLimited {
            retry_after,
            reason,
        }) => {
            let payload = json!({
                "error": reason,
                "retry_after": retry_after,
            });
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after.to_string())],
                Json(payload),
            )
                .into_response()
        }
    }
}

pub(crate) async fn system_info_handler<S, L>(
    State(service): State<Arc<CreditDecisionService<S, L>>>,
) -> Json<Value>
where
    S: CreditScorer + 'static,
    L: RateLimitStore + 'static,
{
    Json(json!({
        "system": "Finiş Bankası Credit Decision Engine",
        "version": service.scorer().version(),
        "features": [
            "8 bileşenli ağırlıklı kredi skorlaması",
            "Sabit %4.09 faiz ile annüite hesaplaması",
            "Temerrüt ve hukuki ihtilaf için politika sınırı",
            "Açıklanabilir karar çıktısı (ilk 5 faktör)",
            "Türk bankacılık vergileri (KKDF/BSMV)",
            "İstek doğrulama ve hız sınırlama",
        ],
        "status": "active",
        "timestamp": Local::now().naive_local(),
    }))
}
