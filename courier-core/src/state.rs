//! Application state trait for dependency injection
//!
//! Handlers are generic over [`HasServices`], so the same router serves the
//! production `AppState` and test states built on in-memory collaborators.

use crate::config::Config;
use crate::email::EmailTransport;
use crate::service::EmailService;
use crate::storage::FileStore;
use metrics_exporter_prometheus::PrometheusHandle;

/// Trait for application state that provides access to services.
pub trait HasServices: Clone + Send + Sync + 'static {
    /// The object store holding templates and attachments
    type Store: FileStore + 'static;
    /// The transport used to send assembled emails
    type Transport: EmailTransport + 'static;

    /// Get the application configuration
    fn config(&self) -> &Config;

    /// Get the email orchestration service
    fn email_service(&self) -> &EmailService<Self::Store, Self::Transport>;

    /// Prometheus handle, when metrics are enabled
    fn metrics_handle(&self) -> Option<&PrometheusHandle>;
}
