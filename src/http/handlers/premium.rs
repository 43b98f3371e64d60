use crate::domain::event::{EventDraft, EventType, PaymentEvent};
use crate::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub const PREMIUM_DATA_PRICE_APT: f64 = 0.01;
pub const PREDICTIONS_PRICE_APT: f64 = 0.01;

pub async fn premium_data(State(state): State<AppState>, headers: HeaderMap) -> Response {
    paid_endpoint(
        &state,
        &headers,
        "/api/premium-data",
        PREMIUM_DATA_PRICE_APT,
        "premium payload",
    )
    .await
}

pub async fn predictions(State(state): State<AppState>, headers: HeaderMap) -> Response {
    paid_endpoint(
        &state,
        &headers,
        "/api/predictions",
        PREDICTIONS_PRICE_APT,
        "predictions payload",
    )
    .await
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn paid_endpoint(
    state: &AppState,
    headers: &HeaderMap,
    endpoint: &str,
    amount_apt: f64,
    payload: &str,
) -> Response {
    let auth = match state.gate.authorize(headers, endpoint, amount_apt).await {
        Ok(auth) => auth,
        Err(denied) => return (denied.status, Json(denied.body)).into_response(),
    };

    // The gate certified payment; delivery is on us, so the success event is
    // recorded here rather than inside the gate.
    let event = PaymentEvent::from_draft(
        EventDraft {
            event_type: EventType::PaymentSuccess,
            endpoint: endpoint.to_string(),
            status: 200,
            amount: Some(amount_apt),
            currency: Some(crate::service::payment_gate::CURRENCY.to_string()),
            payer: Some(auth.payer.clone()),
            request_id: auth.request_id.clone(),
            trace_id: auth.trace_id.clone(),
            error: None,
            metadata: Some(auth.metadata.clone()),
        },
        &state.anon_salt,
    );
    state.event_store.append(event).await;

    let mut response = Json(json!({ "ok": true, "data": payload })).into_response();
    set_correlation_headers(&mut response, &auth.request_id, &auth.trace_id);
    response
}

fn set_correlation_headers(response: &mut Response, request_id: &str, trace_id: &str) {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    if let Ok(value) = HeaderValue::from_str(trace_id) {
        response.headers_mut().insert("x-trace-id", value);
    }
}
