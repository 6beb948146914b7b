use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::modules::config::AppConfig;

const OUTBOUND_TIMEOUT_SECS: u64 = 30;
const DESTINATIONS_PATH: &str = "/destination-configuration/v1/subaccountDestinations";

/// One backend description as returned by the destination registry.
///
/// The registry attaches arbitrary extra properties per destination; they are
/// kept in `extra` so `/destinations` echoes the record faithfully.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destination {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Authentication", default)]
    pub authentication: String,
    #[serde(rename = "User", skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(rename = "Password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Destination {
    pub fn is_basic_auth(&self) -> bool {
        self.authentication == "BasicAuthentication"
    }
}

/// Resolves the bound destination registry from VCAP_SERVICES and fetches the
/// one destination this service fronts.
pub struct DestinationResolver {
    client: reqwest::Client,
}

impl DestinationResolver {
    pub fn new() -> Self {
        Self {
            client: crate::utils::http::create_client(OUTBOUND_TIMEOUT_SECS),
        }
    }

    /// Fetch destination details from the binding.
    pub async fn resolve(&self, config: &AppConfig, token: &str) -> AppResult<Destination> {
        let uri = registry_uri(config.vcap_services.as_deref())?;

        let response = self
            .client
            .get(format!("{}{}", uri, DESTINATIONS_PATH))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream { status, body });
        }

        let destinations = response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Protocol(format!("Destination list parsing failed: {}", e)))?;

        let list = destinations
            .as_array()
            .ok_or_else(|| AppError::Protocol("Destination list is not an array".into()))?;

        // First destination wins; the binding carries exactly one logical backend.
        let first = list
            .first()
            .ok_or_else(|| AppError::NotFound("No destinations found".into()))?;

        serde_json::from_value(first.clone())
            .map_err(|e| AppError::Protocol(format!("Malformed destination entry: {}", e)))
    }
}

impl Default for DestinationResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Locate the destination registry's base URI inside the VCAP_SERVICES
/// binding document: first "destination" instance, `credentials.uri`.
fn registry_uri(vcap_services: Option<&str>) -> AppResult<String> {
    let raw = vcap_services.ok_or_else(|| {
        AppError::Config("VCAP_SERVICES environment variable is not set".into())
    })?;

    let services: Value = serde_json::from_str(raw)
        .map_err(|e| AppError::Config(format!("VCAP_SERVICES is not valid JSON: {}", e)))?;

    let instance = services
        .get("destination")
        .and_then(|v| v.as_array())
        .and_then(|instances| instances.first())
        .ok_or_else(|| {
            AppError::Config("No destination service found in VCAP_SERVICES".into())
        })?;

    instance
        .get("credentials")
        .and_then(|c| c.get("uri"))
        .and_then(|u| u.as_str())
        .map(|u| u.to_string())
        .ok_or_else(|| {
            AppError::Config("Destination service binding has no credentials.uri".into())
        })
}
