use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub const EVENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PaymentRequired,
    PaymentSuccess,
    PaymentFailed,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PaymentRequired => "payment_required",
            EventType::PaymentSuccess => "payment_success",
            EventType::PaymentFailed => "payment_failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "payment_required" => Some(EventType::PaymentRequired),
            "payment_success" => Some(EventType::PaymentSuccess),
            "payment_failed" => Some(EventType::PaymentFailed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    InsufficientBalance,
    SignatureFailure,
    PricingMismatch,
    RpcError,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::InsufficientBalance => "insufficient_balance",
            ErrorCategory::SignatureFailure => "signature_failure",
            ErrorCategory::PricingMismatch => "pricing_mismatch",
            ErrorCategory::RpcError => "rpc_error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "insufficient_balance" => Some(ErrorCategory::InsufficientBalance),
            "signature_failure" => Some(ErrorCategory::SignatureFailure),
            "pricing_mismatch" => Some(ErrorCategory::PricingMismatch),
            "rpc_error" => Some(ErrorCategory::RpcError),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub category: ErrorCategory,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEvent {
    pub id: Uuid,
    pub schema_version: u32,
    pub timestamp: i64,
    pub event_type: EventType,
    pub request_id: String,
    pub trace_id: String,
    pub endpoint: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_anonymized: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Everything a call site knows about one lifecycle occurrence. The raw payer
/// address only ever lives here; `PaymentEvent::from_draft` anonymizes it
/// before anything is stored.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub event_type: EventType,
    pub endpoint: String,
    pub status: u16,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub payer: Option<String>,
    pub request_id: String,
    pub trace_id: String,
    pub error: Option<ErrorInfo>,
    pub metadata: Option<serde_json::Value>,
}

impl PaymentEvent {
    pub fn from_draft(draft: EventDraft, anon_salt: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            schema_version: EVENT_SCHEMA_VERSION,
            timestamp: chrono::Utc::now().timestamp_millis(),
            event_type: draft.event_type,
            request_id: draft.request_id,
            trace_id: draft.trace_id,
            endpoint: draft.endpoint,
            status: draft.status,
            amount: draft.amount,
            currency: draft.currency,
            payer_anonymized: draft.payer.as_deref().map(|p| anonymize_payer(anon_salt, p)),
            error: draft.error,
            metadata: draft.metadata,
        }
    }
}

pub fn anonymize_payer(salt: &str, payer: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}", salt, payer).as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymization_is_stable_per_salt() {
        let a = anonymize_payer("salt-1", "0xABCD");
        let b = anonymize_payer("salt-1", "0xABCD");
        let c = anonymize_payer("salt-2", "0xABCD");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn draft_never_leaks_raw_payer() {
        let event = PaymentEvent::from_draft(
            EventDraft {
                event_type: EventType::PaymentSuccess,
                endpoint: "/api/premium-data".to_string(),
                status: 200,
                amount: Some(0.01),
                currency: Some("APT".to_string()),
                payer: Some("0xABCD".to_string()),
                request_id: "r1".to_string(),
                trace_id: "t1".to_string(),
                error: None,
                metadata: None,
            },
            "dev-salt",
        );

        let anonymized = event.payer_anonymized.clone();
        assert_eq!(anonymized.as_deref(), Some(anonymize_payer("dev-salt", "0xABCD").as_str()));
        let json = serde_json::to_string(&event).expect("serializable");
        assert!(!json.contains("0xABCD"));
    }
}
