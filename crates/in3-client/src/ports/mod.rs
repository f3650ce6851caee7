//! # Ports Module
//!
//! Hexagonal architecture ports (inbound API, outbound runtime).

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
