use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::error::{AppError, AppResult};
use crate::modules::config::AppConfig;
use crate::proxy::destination::DestinationResolver;
use crate::proxy::handlers;
use crate::proxy::token::TokenProvider;
use crate::proxy::upstream::UpstreamClient;

/// Axum application state
///
/// Everything here is read-only per request; the pipeline components keep no
/// state between invocations, so the whole struct is safe to clone per call.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenProvider>,
    pub destinations: Arc<DestinationResolver>,
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            tokens: Arc::new(TokenProvider::new()),
            destinations: Arc::new(DestinationResolver::new()),
            upstream: Arc::new(UpstreamClient::new()),
        }
    }
}

/// Build the service router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/destinations", get(handlers::list_destinations))
        .route("/odata", get(handlers::get_odata))
        .route("/odata/*resource", get(handlers::get_odata_resource))
        .route("/healthz", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(crate::proxy::middleware::cors_layer())
        .with_state(state)
}

/// Axum server instance
pub struct AxumServer {
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl AxumServer {
    /// Start Axum server
    pub async fn start(
        config: AppConfig,
    ) -> AppResult<(Self, tokio::task::JoinHandle<()>)> {
        let addr = config.bind_address();
        let app = build_router(AppState::new(config));

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Config(format!("Failed to bind address {}: {}", addr, e)))?;

        tracing::info!("Destination proxy started at http://{}", addr);

        // Create shutdown channel
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let server_instance = Self {
            shutdown_tx: Some(shutdown_tx),
        };

        // Start server in new task
        let handle = tokio::spawn(async move {
            use hyper::server::conn::http1;
            use hyper_util::rt::TokioIo;
            use hyper_util::service::TowerToHyperService;

            loop {
                tokio::select! {
                    res = listener.accept() => {
                        match res {
                            Ok((stream, _)) => {
                                let io = TokioIo::new(stream);
                                let service = TowerToHyperService::new(app.clone());

                                tokio::task::spawn(async move {
                                    if let Err(err) = http1::Builder::new()
                                        .serve_connection(io, service)
                                        .await
                                    {
                                        debug!("Connection handling finished or errored: {:?}", err);
                                    }
                                });
                            }
                            Err(e) => {
                                error!("Failed to accept connection: {:?}", e);
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("Destination proxy stopped listening");
                        break;
                    }
                }
            }
        });

        Ok((server_instance, handle))
    }

    /// Stop server
    pub fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
