//! Courier Core - templated email dispatch service
//!
//! Renders templates fetched from object storage, attaches stored files,
//! and sends the resulting MIME messages through AWS SES.

pub mod api;
pub mod aws;
pub mod config;
pub mod domain;
pub mod email;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod server;
pub mod service;
pub mod state;
pub mod storage;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
