//! Shared types for the Terno chat client and agent endpoint.

pub mod error;
pub mod protocol;

pub use error::*;
pub use protocol::*;
