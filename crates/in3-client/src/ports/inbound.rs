//! # Inbound Ports
//!
//! API trait defining what the Incubed client can do.

use serde_json::Value;

use crate::config::ClientConfig;
use crate::domain::{Account, ChainConfig, In3Result, NodeList};

/// Incubed client API - inbound port.
///
/// Every operation performs at most one blocking runtime call.
pub trait In3Api: Send + Sync {
    /// Chain the client is bound to.
    fn chain(&self) -> &ChainConfig;

    /// Apply a configuration through the runtime.
    fn configure(&mut self, config: &ClientConfig) -> In3Result<()>;

    /// Read and type the current node registry.
    fn get_node_list(&self) -> In3Result<NodeList>;

    /// ABI-encode a call, e.g. `balanceOf(address)` with one address.
    fn abi_encode(&self, signature: &str, args: &[Value]) -> In3Result<String>;

    /// ABI-decode a `0x` value with the given signature.
    fn abi_decode(&self, signature: &str, encoded: &str) -> In3Result<Vec<Value>>;

    /// Effective configuration as seen by the runtime.
    fn get_config(&self) -> In3Result<ClientConfig>;

    /// Resolve an ENS name to an account.
    fn ens_resolve(&self, name: &str) -> In3Result<Account>;
}
