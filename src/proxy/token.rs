use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::modules::config::AppConfig;

const OUTBOUND_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    // Absent access_token must surface as an error, never as an empty token.
    access_token: Option<String>,
}

/// Exchanges the configured client credentials for a bearer token usable
/// against the destination registry. Tokens are fetched fresh on every
/// pipeline invocation and never cached.
pub struct TokenProvider {
    client: reqwest::Client,
}

impl TokenProvider {
    pub fn new() -> Self {
        Self {
            client: crate::utils::http::create_client(OUTBOUND_TIMEOUT_SECS),
        }
    }

    /// Fetch an OAuth token via the client-credentials grant.
    pub async fn fetch_token(&self, config: &AppConfig) -> AppResult<String> {
        let token_url = config
            .token_url
            .as_deref()
            .ok_or_else(|| AppError::Config("TOKEN_URL environment variable is not set".into()))?;
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            return Err(AppError::Config(
                "CLIENT_ID and CLIENT_SECRET must be set".into(),
            ));
        }

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ];

        // Append /oauth/token for the token endpoint
        let response = self
            .client
            .post(format!("{}/oauth/token", token_url))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream { status, body });
        }

        let token_res = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AppError::Protocol(format!("Token parsing failed: {}", e)))?;

        token_res
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Protocol("Token response did not contain an access_token".into())
            })
    }
}

impl Default for TokenProvider {
    fn default() -> Self {
        Self::new()
    }
}
