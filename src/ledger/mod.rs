use anyhow::Result;
use serde::Deserialize;

pub mod aptos;
pub mod verifier;

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerTransaction {
    #[serde(rename = "type")]
    pub txn_type: Option<String>,
    pub success: Option<bool>,
    pub sender: Option<String>,
    pub version: Option<String>,
    pub payload: Option<TransactionPayload>,
}

/// Node responses spell the argument list either `arguments` or `args`
/// depending on the API surface that produced them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionPayload {
    pub function: Option<String>,
    pub arguments: Option<Vec<serde_json::Value>>,
    pub args: Option<Vec<serde_json::Value>>,
}

impl TransactionPayload {
    pub fn argument_list(&self) -> &[serde_json::Value] {
        self.arguments
            .as_deref()
            .or(self.args.as_deref())
            .unwrap_or(&[])
    }
}

/// Read access to a ledger node's transaction history. `Ok(None)` means the
/// node answered but had no such transaction; `Err` is reserved for transport
/// failures.
#[async_trait::async_trait]
pub trait LedgerClient: Send + Sync {
    async fn transaction_by_hash(&self, txn_hash: &str) -> Result<Option<LedgerTransaction>>;
}
