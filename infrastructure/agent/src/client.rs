use std::time::Duration;

use reqwest::Client;

/// How to reach peer agents: every host is assumed to serve the same API on
/// the same scheme and port.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub scheme: String,
    pub port: u16,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            port: 8000,
            api_key: None,
            timeout: Duration::from_secs(90),
        }
    }
}

/// Shared HTTP client for peer agent endpoints.
pub struct AgentClient {
    pub client: Client,
    config: AgentConfig,
}

impl AgentClient {
    pub fn new(config: AgentConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.config.api_key.as_deref()
    }

    /// Returns the shell endpoint URL on the given host.
    pub fn shell_url(&self, host: &str) -> String {
        format!("{}://{}:{}/shell", self.config.scheme, host, self.config.port)
    }
}
