use std::env;

const DEFAULT_PORT: u16 = 8080;

/// Process-wide configuration, read from the environment once at startup.
///
/// Values that may legitimately be absent stay `Option` here; the pipeline
/// step that needs them reports the missing variable at request time instead
/// of refusing to boot. A misconfigured instance still serves `/` and
/// `/healthz`, which is what the platform health check expects.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Base URL of the OAuth token service; `/oauth/token` is appended.
    pub token_url: Option<String>,
    /// Raw VCAP_SERVICES binding document, parsed per request.
    pub vcap_services: Option<String>,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Self {
        Self {
            client_id: env::var("CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("CLIENT_SECRET").unwrap_or_default(),
            token_url: env::var("TOKEN_URL").ok().filter(|s| !s.is_empty()),
            vcap_services: env::var("VCAP_SERVICES").ok().filter(|s| !s.is_empty()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }

    /// Actual listen address for the HTTP server.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
