// Middleware module - Axum middleware

use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS; the service fronts a read-only OData relay.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
