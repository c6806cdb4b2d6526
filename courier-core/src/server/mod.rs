//! Server initialization and routing

use crate::api;
use crate::aws::load_sdk_config;
use crate::config::Config;
use crate::email::{MimeTransport, SesEmailProvider};
use crate::middleware::ObservabilityLayer;
use crate::openapi::ApiDoc;
use crate::service::EmailService;
use crate::state::HasServices;
use crate::storage::S3FileStore;
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Production email service: S3 for templates and attachments, SES for delivery
pub type ProductionEmailService = EmailService<S3FileStore, MimeTransport<SesEmailProvider>>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub email_service: Arc<ProductionEmailService>,
    pub prometheus_handle: Option<PrometheusHandle>,
}

/// Implement HasServices trait for production AppState
impl HasServices for AppState {
    type Store = S3FileStore;
    type Transport = MimeTransport<SesEmailProvider>;

    fn config(&self) -> &Config {
        &self.config
    }

    fn email_service(&self) -> &ProductionEmailService {
        &self.email_service
    }

    fn metrics_handle(&self) -> Option<&PrometheusHandle> {
        self.prometheus_handle.as_ref()
    }
}

/// Run the server
pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    // One SDK configuration for both AWS clients
    let sdk_config = load_sdk_config(&config.aws).await;

    let store = Arc::new(S3FileStore::from_sdk_config(&sdk_config));
    let provider = Arc::new(SesEmailProvider::from_sdk_config(
        &sdk_config,
        config.email.configuration_set.clone(),
    ));
    let transport = Arc::new(MimeTransport::new(provider, config.email.sender.clone()));
    let email_service = Arc::new(EmailService::new(
        store,
        transport,
        config.storage.bucket_name.clone(),
    ));

    info!(
        region = %config.aws.region,
        bucket = %config.storage.bucket_name,
        sender = %config.email.sender,
        "Email service initialized"
    );

    let http_addr = config.http_addr();
    let state = AppState {
        config: Arc::new(config),
        email_service,
        prometheus_handle,
    };

    let app = build_router(state);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Build the HTTP router with generic state type
///
/// This function is generic over the state type, allowing it to work with
/// both production `AppState` and test implementations that implement `HasServices`.
pub fn build_router<S: HasServices>(state: S) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/healthcheck", get(api::health::healthcheck))
        .route("/metrics", get(api::metrics::metrics_handler::<S>))
        // Email endpoints
        .route(
            "/api/email/single/send",
            post(api::email::send_single::<S>),
        )
        .route(
            "/api/email/multiple/send",
            post(api::email::send_multiple::<S>),
        );

    if state.config().swagger_enabled {
        router = router.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    router
        .layer(ObservabilityLayer)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
