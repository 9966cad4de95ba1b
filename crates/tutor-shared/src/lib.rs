//! # Tutor Shared
//!
//! Wire types shared by the gateway and its admin clients.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
