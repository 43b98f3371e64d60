use crate::ledger::{LedgerClient, LedgerTransaction};
use anyhow::{Context, Result};

pub struct AptosNodeClient {
    pub node_url: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

impl AptosNodeClient {
    pub fn new(node_url: String, timeout_ms: u64) -> Self {
        Self {
            node_url,
            timeout_ms,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl LedgerClient for AptosNodeClient {
    async fn transaction_by_hash(&self, txn_hash: &str) -> Result<Option<LedgerTransaction>> {
        let url = format!(
            "{}/transactions/by_hash/{}",
            self.node_url.trim_end_matches('/'),
            txn_hash
        );

        let resp = self
            .client
            .get(&url)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .context("ledger node request failed")?;

        if !resp.status().is_success() {
            return Ok(None);
        }

        let txn = resp
            .json::<LedgerTransaction>()
            .await
            .context("ledger node returned malformed transaction")?;
        Ok(Some(txn))
    }
}
