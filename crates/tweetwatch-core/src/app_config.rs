use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Base URL shared by the crawler, classifier, and repository services.
    pub backend_url: String,
    pub backend_token: Option<String>,
    /// PEM bundle trusted in addition to the system roots.
    pub backend_ca_cert: Option<PathBuf>,
    pub backend_timeout_secs: u64,
    pub backend_max_retries: u32,
    pub backend_retry_backoff_ms: u64,
    /// Cron expression (with seconds) for the unclassified-tweet sweep.
    pub sweep_cron: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("backend_url", &self.backend_url)
            .field(
                "backend_token",
                &self.backend_token.as_ref().map(|_| "[redacted]"),
            )
            .field("backend_ca_cert", &self.backend_ca_cert)
            .field("backend_timeout_secs", &self.backend_timeout_secs)
            .field("backend_max_retries", &self.backend_max_retries)
            .field("backend_retry_backoff_ms", &self.backend_retry_backoff_ms)
            .field("sweep_cron", &self.sweep_cron)
            .finish()
    }
}
