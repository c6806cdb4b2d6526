//! REST API handlers

pub mod email;
pub mod health;
pub mod metrics;
