use reqwest::Client;

/// Create a unified configuration HTTP client.
/// All outbound calls go through clients built here so every call carries a
/// bounded timeout; the platform gives no other cancellation path.
pub fn create_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}
