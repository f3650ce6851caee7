//! # Application Module
//!
//! The client façade orchestrating validation, the factory and the runtime.

pub mod service;

pub use service::{ChainSelector, ClientState, In3Client};
