//! Domain models for Courier Core

pub mod email;
pub mod outcome;

pub use email::*;
pub use outcome::*;
