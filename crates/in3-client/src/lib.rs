//! # In3 Client
//!
//! Client access layer for the Incubed verification network.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Bind to a chain, read the node registry as typed entities, and pass ABI
//! encode/decode requests through to the runtime after local validation.
//! Proof verification, node selection and request dispatch belong to the
//! runtime behind [`In3Runtime`].
//!
//! ## Guarantees
//!
//! | Concern | Behavior |
//! |---------|----------|
//! | Signatures | Rejected locally before any runtime call |
//! | Encoded values | `0x` prefix and one ABI word required before decoding |
//! | Deposits | 256-bit, never truncated to a machine word |
//! | Entities | All fields coerce or nothing is returned |
//! | Failures | Returned to the caller, never retried |
//!
//! ## Module Structure
//!
//! ```text
//! in3-client/
//! ├── domain/          # Chains, Node, NodeList, Account, errors
//! ├── algorithms/      # Signature checks, coercion, deserialization factory
//! ├── ports/           # In3Api (inbound) + In3Runtime (outbound)
//! ├── adapters/        # JSON-RPC runtime over a blocking transport
//! ├── application/     # In3Client façade
//! └── config.rs        # ClientConfig
//! ```
//!
//! ## Example
//!
//! ```
//! use in3_client::{In3Api, In3Client, MockRuntime};
//! use serde_json::json;
//!
//! let client = In3Client::new("kovan", None, MockRuntime::default()).unwrap();
//! let encoded = client.abi_encode("balanceOf(address)", &[json!("0x00")]).unwrap();
//! assert!(encoded.starts_with("0x"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{JsonRpcRuntime, Transport};
pub use algorithms::{
    node_from_wire, node_list_from_wire, validate_encoded_value, validate_signature,
    AbiSignature,
};
pub use application::{ChainSelector, ClientState, In3Client};
pub use config::{ClientConfig, ProofLevel};
pub use domain::{
    chain_id, Account, AccountError, BootNode, ChainConfig, ChainId, CoercionError,
    ConfigurationError, In3Error, In3Result, Node, NodeList, NodeProps, RuntimeError,
    ValidationError, SUPPORTED_CHAINS,
};
pub use ports::{In3Api, In3Runtime, MockRuntime, RuntimeCall, RuntimeMethod, TypedRuntime};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
