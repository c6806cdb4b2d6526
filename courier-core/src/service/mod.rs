//! Business logic layer

pub mod email;

pub use email::{EmailError, EmailService};
