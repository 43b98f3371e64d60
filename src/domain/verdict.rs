use serde::Serialize;
use serde_json::json;

/// Outcome of checking one ledger transaction against the expected payment
/// terms. Expected failure modes are data, not errors; only transport faults
/// surface as `Err` from the verifier.
#[derive(Debug, Clone)]
pub enum VerificationVerdict {
    Verified(VerifiedTransfer),
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifiedTransfer {
    pub payer: String,
    pub txn_hash: String,
    pub ledger_version: Option<String>,
    pub function: Option<String>,
}

impl VerifiedTransfer {
    pub fn provenance(&self) -> serde_json::Value {
        json!({
            "txn_hash": self.txn_hash,
            "block_height": self.ledger_version,
            "function": self.function,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    TxnNotFound,
    NotUserTransaction,
    TxnFailed,
    UnsupportedFunction,
    AmountOrRecipientMismatch,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::TxnNotFound => "txn_not_found",
            RejectReason::NotUserTransaction => "not_user_transaction",
            RejectReason::TxnFailed => "txn_failed",
            RejectReason::UnsupportedFunction => "unsupported_function",
            RejectReason::AmountOrRecipientMismatch => "amount_or_recipient_mismatch",
        }
    }
}
