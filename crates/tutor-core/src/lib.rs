//! # Tutor Core
//!
//! The domain layer of the tutor gateway.
//! Admission-control types and the ports the request pipeline depends on,
//! with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::ConfigError;
