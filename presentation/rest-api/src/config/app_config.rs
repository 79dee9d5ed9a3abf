use super::{cors_config, server_config::ServerConfig};
use poem::middleware::Cors;

/// HTTP-edge configuration: where to listen and which origins may call.
///
/// Adapter settings (database shards, executors, API keys) are loaded by
/// the modules that build those adapters, not aggregated here.
pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: Cors,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            cors: cors_config::init_cors(),
        }
    }
}
