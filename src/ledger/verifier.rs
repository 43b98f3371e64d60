use crate::domain::verdict::{RejectReason, VerificationVerdict, VerifiedTransfer};
use crate::ledger::LedgerClient;
use anyhow::Result;

pub const OCTAS_PER_APT: f64 = 100_000_000.0;

/// The one transfer entry function the verifier understands. The positional
/// argument convention below (recipient second-to-last, amount last) is a
/// property of this signature, so anything else is rejected outright.
pub const TRANSFER_FUNCTION: &str = "0x1::aptos_account::transfer";

pub fn octas_for_apt(amount_apt: f64) -> u64 {
    (amount_apt * OCTAS_PER_APT).round() as u64
}

pub async fn verify_transfer(
    client: &dyn LedgerClient,
    txn_hash: &str,
    receiver: &str,
    amount_apt: f64,
) -> Result<VerificationVerdict> {
    let txn = match client.transaction_by_hash(txn_hash).await? {
        Some(txn) => txn,
        None => return Ok(VerificationVerdict::Rejected(RejectReason::TxnNotFound)),
    };

    if txn.txn_type.as_deref() != Some("user_transaction") {
        return Ok(VerificationVerdict::Rejected(RejectReason::NotUserTransaction));
    }
    if txn.success == Some(false) {
        return Ok(VerificationVerdict::Rejected(RejectReason::TxnFailed));
    }

    let payload = txn.payload.unwrap_or_default();
    if payload.function.as_deref() != Some(TRANSFER_FUNCTION) {
        return Ok(VerificationVerdict::Rejected(RejectReason::UnsupportedFunction));
    }

    let args = payload.argument_list();
    let (recipient, amount) = match args {
        [.., recipient, amount] => (recipient, amount),
        _ => {
            return Ok(VerificationVerdict::Rejected(
                RejectReason::AmountOrRecipientMismatch,
            ))
        }
    };

    let expected_octas = octas_for_apt(amount_apt);
    let ok_amount = parse_octas(amount) == Some(expected_octas);
    let ok_recipient = recipient
        .as_str()
        .map(|r| r.eq_ignore_ascii_case(receiver))
        .unwrap_or(false);

    if !ok_amount || !ok_recipient {
        return Ok(VerificationVerdict::Rejected(
            RejectReason::AmountOrRecipientMismatch,
        ));
    }

    Ok(VerificationVerdict::Verified(VerifiedTransfer {
        payer: txn.sender.unwrap_or_default(),
        txn_hash: txn_hash.to_string(),
        ledger_version: txn.version,
        function: payload.function,
    }))
}

// Octa amounts arrive as JSON strings from the node's REST API, but some
// tooling emits bare numbers.
fn parse_octas(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::String(s) => s.parse::<u64>().ok(),
        serde_json::Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_point_conversion_is_exact() {
        assert_eq!(octas_for_apt(0.01), 1_000_000);
        assert_eq!(octas_for_apt(0.005), 500_000);
        assert_eq!(octas_for_apt(1.0), 100_000_000);
    }

    #[test]
    fn octas_parse_accepts_both_wire_forms() {
        assert_eq!(parse_octas(&serde_json::json!("1000000")), Some(1_000_000));
        assert_eq!(parse_octas(&serde_json::json!(1_000_000)), Some(1_000_000));
        assert_eq!(parse_octas(&serde_json::json!(["nope"])), None);
    }
}
