// Upstream client implementation
// Forwards a request to the resolved backend and relays the raw response.

use base64::Engine;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::error::{AppError, AppResult};
use crate::proxy::destination::Destination;

const OUTBOUND_TIMEOUT_SECS: u64 = 30;

// Legacy enumeration suffix used when the caller names no resource:
// fetch exactly one record, JSON-encoded.
const DEFAULT_ODATA_QUERY: &str = "?$skip=0&$top=1&$format=json";

/// The backend's HTTP response, byte-exact. No body parsing, no re-encoding.
#[derive(Debug)]
pub struct ProxyResult {
    pub status: StatusCode,
    pub body: Bytes,
    pub content_type: Option<String>,
}

pub struct UpstreamClient {
    http_client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new() -> Self {
        Self {
            http_client: crate::utils::http::create_client(OUTBOUND_TIMEOUT_SECS),
        }
    }

    /// Build the backend URL.
    ///
    /// Plain string concatenation by contract: the destination URL is taken
    /// as-is and the caller supplies the resource already prefixed (leading
    /// `/` or `?`). No escaping, no separator normalization.
    fn build_url(destination_url: &str, resource: Option<&str>) -> String {
        match resource {
            Some(resource) => format!("{}{}", destination_url, resource),
            None => format!("{}{}", destination_url, DEFAULT_ODATA_QUERY),
        }
    }

    /// Build the Authorization headers for the resolved auth scheme.
    ///
    /// BasicAuthentication sends the static Basic credential AND the bearer
    /// token as two separate Authorization values; the registry's consumers
    /// rely on that observed behavior, so neither header may be dropped.
    fn build_headers(destination: &Destination, access_token: &str) -> AppResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        if destination.is_basic_auth() {
            let (user, password) = match (&destination.user, &destination.password) {
                (Some(user), Some(password)) => (user, password),
                _ => {
                    return Err(AppError::Config(
                        "BasicAuthentication destination is missing User or Password".into(),
                    ))
                }
            };
            let credential =
                base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", user, password));
            headers.append(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Basic {}", credential))
                    .map_err(|e| AppError::Config(format!("Invalid basic credential: {}", e)))?,
            );
        }

        headers.append(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", access_token))
                .map_err(|e| AppError::Config(format!("Invalid bearer token: {}", e)))?,
        );

        Ok(headers)
    }

    /// Call the backend OData service through the resolved destination.
    ///
    /// Whatever status the backend answers with passes through untouched;
    /// only transport failures surface as errors.
    pub async fn forward(
        &self,
        destination: &Destination,
        access_token: &str,
        resource: Option<&str>,
    ) -> AppResult<ProxyResult> {
        let url = Self::build_url(&destination.url, resource);
        let headers = Self::build_headers(destination, access_token)?;

        tracing::debug!(
            "Forwarding to {} (auth: {})",
            url,
            destination.authentication
        );

        let response = self.http_client.get(&url).headers(headers).send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let body = response.bytes().await?;

        Ok(ProxyResult {
            status,
            body,
            content_type,
        })
    }
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination(authentication: &str, user: Option<&str>, password: Option<&str>) -> Destination {
        Destination {
            url: "https://api.example.com/Products".to_string(),
            authentication: authentication.to_string(),
            user: user.map(|s| s.to_string()),
            password: password.map(|s| s.to_string()),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_build_url() {
        let url1 = UpstreamClient::build_url("https://api.example.com/Products", None);
        assert_eq!(
            url1,
            "https://api.example.com/Products?$skip=0&$top=1&$format=json"
        );

        // Pure concatenation, nothing inserted or escaped.
        let url2 = UpstreamClient::build_url("https://api.example.com/Products", Some("?$top=5"));
        assert_eq!(url2, "https://api.example.com/Products?$top=5");

        let url3 = UpstreamClient::build_url("https://b.example", Some("/Entities?$format=json"));
        assert_eq!(url3, "https://b.example/Entities?$format=json");
    }

    #[test]
    fn bearer_only_for_non_basic_destinations() {
        let headers =
            UpstreamClient::build_headers(&destination("NoAuthentication", None, None), "tok")
                .unwrap();
        let values: Vec<_> = headers
            .get_all(AUTHORIZATION)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(values, vec!["Bearer tok"]);
    }

    #[test]
    fn basic_destinations_send_both_credentials() {
        let headers = UpstreamClient::build_headers(
            &destination("BasicAuthentication", Some("alice"), Some("s3cret")),
            "tok",
        )
        .unwrap();
        let values: Vec<_> = headers
            .get_all(AUTHORIZATION)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        // "alice:s3cret" base64-encoded.
        assert_eq!(values, vec!["Basic YWxpY2U6czNjcmV0", "Bearer tok"]);
    }

    #[test]
    fn basic_destination_without_credentials_is_a_config_error() {
        let err = UpstreamClient::build_headers(
            &destination("BasicAuthentication", Some("alice"), None),
            "tok",
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn backend_status_and_body_pass_through() {
        use axum::routing::get;
        use axum::Router;

        let app = Router::new().route(
            "/Products",
            get(|| async {
                (
                    axum::http::StatusCode::IM_A_TEAPOT,
                    [("content-type", "application/json")],
                    r#"{"value":[]}"#,
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let mut dest = destination("NoAuthentication", None, None);
        dest.url = format!("http://{}/Products", addr);

        let result = UpstreamClient::new()
            .forward(&dest, "tok", Some("?$top=5"))
            .await
            .unwrap();
        assert_eq!(result.status.as_u16(), 418);
        assert_eq!(result.body.as_ref(), br#"{"value":[]}"#);
        assert_eq!(result.content_type.as_deref(), Some("application/json"));
    }
}
