//! HTTP middleware for Courier
//!
//! - Observability layer: request ID propagation and HTTP metrics

pub mod metrics;

pub use metrics::ObservabilityLayer;
