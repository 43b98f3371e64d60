use crate::domain::event::{ErrorCategory, ErrorInfo, EventDraft, EventType, PaymentEvent};
use crate::domain::verdict::VerificationVerdict;
use crate::ledger::verifier::verify_transfer;
use crate::ledger::LedgerClient;
use crate::store::event_store::EventStore;
use axum::http::{HeaderMap, StatusCode};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

pub const TXN_HASH_HEADER: &str = "x-aptos-txn-hash";
pub const DECLARED_ERROR_HEADER: &str = "x-aptos-error";
pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const TRACE_ID_HEADER: &str = "x-trace-id";

pub const CURRENCY: &str = "APT";

/// Admission gate for priced endpoints. Certifies that the caller paid the
/// expected amount on-chain; delivery of the priced action (and its success
/// event) stays with the calling endpoint.
#[derive(Clone)]
pub struct PaymentGate {
    pub receiver: Option<String>,
    pub anon_salt: String,
    pub store: EventStore,
    pub ledger: Arc<dyn LedgerClient>,
}

#[derive(Debug, Clone)]
pub struct Authorized {
    pub payer: String,
    pub metadata: serde_json::Value,
    pub request_id: String,
    pub trace_id: String,
}

#[derive(Debug, Clone)]
pub struct Denied {
    pub status: StatusCode,
    pub body: DenialBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialBody {
    pub error: String,
    pub request_id: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
}

impl PaymentGate {
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        endpoint: &str,
        amount_apt: f64,
    ) -> Result<Authorized, Denied> {
        let (request_id, trace_id) = request_ids(headers);
        let txn_hash = header_value(headers, TXN_HASH_HEADER);
        let declared_error = header_value(headers, DECLARED_ERROR_HEADER);

        let receiver = match &self.receiver {
            Some(receiver) => receiver.clone(),
            None => {
                tracing::warn!(endpoint, "payment receiver not configured");
                self.record_failure(
                    endpoint,
                    amount_apt,
                    &request_id,
                    &trace_id,
                    500,
                    ErrorInfo {
                        code: "missing_receiver".to_string(),
                        category: ErrorCategory::RpcError,
                        message: "PAYMENT_RECEIVER not set".to_string(),
                    },
                    None,
                )
                .await;
                return Err(deny(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "payment_config_missing",
                    &request_id,
                    &trace_id,
                ));
            }
        };

        if let Some(marker) = declared_error {
            self.record_failure(
                endpoint,
                amount_apt,
                &request_id,
                &trace_id,
                403,
                ErrorInfo {
                    code: marker.clone(),
                    category: ErrorCategory::InsufficientBalance,
                    message: "Insufficient balance to pay".to_string(),
                },
                Some(json!({ "reason": marker })),
            )
            .await;
            return Err(deny(
                StatusCode::FORBIDDEN,
                "payment_verification_failed",
                &request_id,
                &trace_id,
            ));
        }

        let Some(txn_hash) = txn_hash else {
            let event = PaymentEvent::from_draft(
                EventDraft {
                    event_type: EventType::PaymentRequired,
                    endpoint: endpoint.to_string(),
                    status: 402,
                    amount: Some(amount_apt),
                    currency: Some(CURRENCY.to_string()),
                    payer: None,
                    request_id: request_id.clone(),
                    trace_id: trace_id.clone(),
                    error: None,
                    metadata: Some(json!({ "reason": "missing_txn_hash" })),
                },
                &self.anon_salt,
            );
            self.store.append(event).await;

            let mut denied = deny(
                StatusCode::PAYMENT_REQUIRED,
                "payment_required",
                &request_id,
                &trace_id,
            );
            denied.body.amount = Some(amount_apt);
            denied.body.currency = Some(CURRENCY.to_string());
            denied.body.receiver = Some(receiver);
            return Err(denied);
        };

        match verify_transfer(self.ledger.as_ref(), &txn_hash, &receiver, amount_apt).await {
            Ok(VerificationVerdict::Verified(transfer)) => {
                tracing::info!(endpoint, txn_hash = %transfer.txn_hash, "payment verified");
                Ok(Authorized {
                    metadata: transfer.provenance(),
                    payer: transfer.payer,
                    request_id,
                    trace_id,
                })
            }
            Ok(VerificationVerdict::Rejected(reason)) => {
                tracing::info!(endpoint, reason = reason.as_str(), "payment rejected");
                self.record_failure(
                    endpoint,
                    amount_apt,
                    &request_id,
                    &trace_id,
                    403,
                    ErrorInfo {
                        code: reason.as_str().to_string(),
                        category: ErrorCategory::SignatureFailure,
                        message: reason.as_str().to_string(),
                    },
                    Some(json!({ "reason": reason.as_str() })),
                )
                .await;
                Err(deny(
                    StatusCode::FORBIDDEN,
                    "payment_verification_failed",
                    &request_id,
                    &trace_id,
                ))
            }
            Err(err) => {
                tracing::error!(endpoint, error = %err, "ledger verification errored");
                self.record_failure(
                    endpoint,
                    amount_apt,
                    &request_id,
                    &trace_id,
                    500,
                    ErrorInfo {
                        code: "rpc_error".to_string(),
                        category: ErrorCategory::RpcError,
                        message: err.to_string(),
                    },
                    None,
                )
                .await;
                Err(deny(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "payment_verification_failed",
                    &request_id,
                    &trace_id,
                ))
            }
        }
    }

    async fn record_failure(
        &self,
        endpoint: &str,
        amount_apt: f64,
        request_id: &str,
        trace_id: &str,
        status: u16,
        error: ErrorInfo,
        metadata: Option<serde_json::Value>,
    ) {
        let event = PaymentEvent::from_draft(
            EventDraft {
                event_type: EventType::PaymentFailed,
                endpoint: endpoint.to_string(),
                status,
                amount: Some(amount_apt),
                currency: Some(CURRENCY.to_string()),
                payer: None,
                request_id: request_id.to_string(),
                trace_id: trace_id.to_string(),
                error: Some(error),
                metadata,
            },
            &self.anon_salt,
        );
        self.store.append(event).await;
    }
}

fn deny(status: StatusCode, error: &str, request_id: &str, trace_id: &str) -> Denied {
    Denied {
        status,
        body: DenialBody {
            error: error.to_string(),
            request_id: request_id.to_string(),
            trace_id: trace_id.to_string(),
            amount: None,
            currency: None,
            receiver: None,
        },
    }
}

pub fn request_ids(headers: &HeaderMap) -> (String, String) {
    let request_id = header_value(headers, REQUEST_ID_HEADER)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let trace_id =
        header_value(headers, TRACE_ID_HEADER).unwrap_or_else(|| Uuid::new_v4().to_string());
    (request_id, trace_id)
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
