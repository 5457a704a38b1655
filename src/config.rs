use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Remote catalog API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub base_url: String,
    pub language: String,
    pub platform: String,
    pub currency: String,
    /// Shared key sent as the `private-key` header
    pub private_key: Option<String>,
    pub timeout_secs: u64,
    /// 0 disables response caching
    pub cache_ttl_secs: u64,
    pub check_reachability: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://stagingapi.mazaady.com/api/v1".to_string(),
            language: "en".to_string(),
            platform: std::env::consts::OS.to_string(),
            currency: "AED".to_string(),
            private_key: None,
            timeout_secs: 30,
            cache_ttl_secs: 300,
            check_reachability: false,
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional config file and
    /// `FORM_`-prefixed environment variables. Nested keys use a double
    /// underscore, e.g. `FORM_SERVER__PORT` or `FORM_GATEWAY__PRIVATE_KEY`.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Add default configuration
        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        // Add config file if it exists
        config = config.add_source(config::File::with_name("config").required(false));

        config = config.add_source(
            config::Environment::with_prefix("FORM")
                .separator("__")
                .prefix_separator("_"),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Serve the built-in demo catalog instead of calling the remote API
    pub fn use_seed_gateway() -> bool {
        std::env::var("FORM_USE_SEED_GATEWAY").unwrap_or_default() == "true"
    }
}
