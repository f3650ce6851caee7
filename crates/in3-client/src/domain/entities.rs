//! # Domain Entities
//!
//! Registry entities returned to callers: [`Node`] and [`NodeList`].
//!
//! Both are plain value objects. They hold no reference to the runtime or
//! to the factory that built them.

use chrono::{DateTime, Utc};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

use super::value_objects::{Account, NodeProps};
use crate::algorithms::coercion::parse_u64;

/// A verifying network participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Endpoint URL.
    pub url: String,
    /// Node account.
    pub address: Account,
    /// Index in the registry contract.
    pub index: u64,
    /// Stake held as collateral, in wei.
    pub deposit: U256,
    /// Capability flags as sent on the wire.
    pub props: String,
    /// Seconds the deposit stays locked after unregistering.
    pub timeout: u64,
    /// Registration time, unix seconds.
    pub register_time: u64,
    /// Relative capacity weight.
    pub weight: u64,
}

impl Node {
    /// Decode the `props` field.
    ///
    /// Returns `None` when the wire value is not a hex or decimal integer.
    pub fn capabilities(&self) -> Option<NodeProps> {
        parse_u64(&self.props).ok().map(NodeProps::from_bits)
    }

    /// Registration time as a UTC timestamp.
    pub fn registered_at(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.register_time)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Registry membership snapshot plus metadata.
///
/// `nodes` keeps wire order and may be a partial view: its length need not
/// equal `total_servers`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeList {
    /// Registered nodes, in wire order.
    pub nodes: Vec<Node>,
    /// Registry contract.
    pub contract: Account,
    /// Registry identifier.
    pub registry_id: String,
    /// Block the list was read at.
    pub last_block_number: u64,
    /// Total number of registered servers.
    pub total_servers: u64,
}

impl NodeList {
    /// Find a node by account.
    pub fn find(&self, address: &Account) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.address == address)
    }

    /// Whether `nodes` holds fewer entries than the registry reports.
    pub fn is_partial(&self) -> bool {
        (self.nodes.len() as u64) < self.total_servers
    }

    /// Iterate nodes in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Sum of all listed deposits, saturating.
    pub fn total_deposit(&self) -> U256 {
        self.nodes
            .iter()
            .fold(U256::zero(), |acc, n| acc.saturating_add(n.deposit))
    }
}
