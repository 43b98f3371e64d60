#[derive(Clone)]
pub struct AppConfig {
    pub receiver: Option<String>,
    pub node_url: String,
    pub anon_salt: String,
    pub bind_addr: String,
    pub ledger_timeout_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            // Absence is a modeled failure at authorize time, not a crash.
            receiver: std::env::var("PAYMENT_RECEIVER").ok().filter(|r| !r.is_empty()),
            node_url: std::env::var("APTOS_NODE_URL")
                .unwrap_or_else(|_| "https://fullnode.testnet.aptoslabs.com/v1".to_string()),
            anon_salt: std::env::var("ANON_SALT").unwrap_or_else(|_| "dev-salt".to_string()),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            ledger_timeout_ms: std::env::var("LEDGER_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(2500),
        }
    }
}
