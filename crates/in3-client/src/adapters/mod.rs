//! # Adapters Module
//!
//! Runtime implementations plugged into the outbound port.

pub mod json_rpc;

pub use json_rpc::{JsonRpcRuntime, Transport};
