//! # Chain Configuration
//!
//! Static identity data for the supported networks.
//!
//! The table is built once per process and exposed only through accessors.

use primitive_types::H256;
use serde::Serialize;
use std::sync::LazyLock;

use super::value_objects::Account;
use crate::config::ClientConfig;

/// Numeric chain identifier.
pub type ChainId = u64;

/// Well-known chain identifiers of the Incubed network family.
pub mod chain_id {
    use super::ChainId;

    /// Multichain pseudo-id.
    pub const MULTICHAIN: ChainId = 0x0;
    /// Ethereum mainnet.
    pub const MAINNET: ChainId = 0x1;
    /// Kovan testnet.
    pub const KOVAN: ChainId = 0x2a;
    /// Goerli testnet.
    pub const GOERLI: ChainId = 0x5;
    /// IPFS.
    pub const IPFS: ChainId = 0x7d0;
    /// Local development chain.
    pub const LOCAL: ChainId = 0xffff;
}

/// Chain names accepted as client selectors.
pub const SUPPORTED_CHAINS: [&str; 3] = ["mainnet", "kovan", "goerli"];

/// Bootstrap node of a chain registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BootNode {
    /// Node account.
    pub address: Account,
    /// Node endpoint.
    pub url: String,
}

/// Identity of a supported network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    /// Chain name (e.g. `mainnet`).
    pub name: String,
    /// Numeric chain identifier.
    pub chain_id: ChainId,
    /// Node registry contract.
    pub registry: Account,
    /// Registry identifier.
    pub registry_id: H256,
    /// Bootstrap nodes.
    pub boot_nodes: Vec<BootNode>,
    /// Client configuration bound to this chain.
    pub client_config: ClientConfig,
}

impl ChainConfig {
    /// Custom chain bound to its own client configuration.
    pub fn new(
        name: impl Into<String>,
        chain_id: ChainId,
        registry: Account,
        registry_id: H256,
        client_config: ClientConfig,
    ) -> Self {
        Self {
            name: name.into(),
            chain_id,
            registry,
            registry_id,
            boot_nodes: Vec::new(),
            client_config,
        }
    }

    /// Look up a supported chain by name.
    pub fn by_name(name: &str) -> Option<&'static ChainConfig> {
        CHAIN_CONFIGS.iter().find(|c| c.name == name)
    }

    /// Look up a supported chain by identifier.
    pub fn by_id(chain_id: ChainId) -> Option<&'static ChainConfig> {
        CHAIN_CONFIGS.iter().find(|c| c.chain_id == chain_id)
    }

    /// All supported chains.
    pub fn all() -> &'static [ChainConfig] {
        &CHAIN_CONFIGS
    }

    /// Chain identifier as `0x`-prefixed hex.
    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }
}

fn fixed_chain(
    name: &str,
    chain_id: ChainId,
    registry: &str,
    registry_id: &str,
    nodes: [(&str, &str); 2],
) -> ChainConfig {
    let registry = registry.parse().expect("static registry address");
    let registry_id = H256::from_slice(&hex::decode(registry_id).expect("static registry id"));
    let boot_nodes = nodes
        .iter()
        .map(|(address, url)| BootNode {
            address: address.parse().expect("static boot node address"),
            url: (*url).to_string(),
        })
        .collect();

    ChainConfig {
        name: name.to_string(),
        chain_id,
        registry,
        registry_id,
        boot_nodes,
        client_config: ClientConfig::for_chain(chain_id),
    }
}

static CHAIN_CONFIGS: LazyLock<Vec<ChainConfig>> = LazyLock::new(|| {
    vec![
        fixed_chain(
            "mainnet",
            chain_id::MAINNET,
            "0xac1b824795e1eb1f6e609fe0da9b9af8beaab60f",
            "23d5345c5c13180a8080bd5ddbe7cde64683755dcce6e734d95b7b573845facb",
            [
                ("0x45d45e6ff99e6c34a235d263965910298985fcfe", "https://in3-v2.slock.it/mainnet/nd-1"),
                ("0x1fe2e9bf29aa1938859af64c413361227d04059a", "https://in3-v2.slock.it/mainnet/nd-2"),
            ],
        ),
        fixed_chain(
            "kovan",
            chain_id::KOVAN,
            "0x4c396dcf50ac396e5fdea18163251699b5fcca25",
            "92eb6ad5ed9068a24c1c85276cd7eb11eda1e8c50b17fbaffaf3e8396df4becf",
            [
                ("0x45d45e6ff99e6c34a235d263965910298985fcfe", "https://in3-v2.slock.it/kovan/nd-1"),
                ("0x1fe2e9bf29aa1938859af64c413361227d04059a", "https://in3-v2.slock.it/kovan/nd-2"),
            ],
        ),
        fixed_chain(
            "goerli",
            chain_id::GOERLI,
            "0x5f51e413581dd76759e9eed51e63d14c8d1379c8",
            "67c02e5e272f9d6b4a33716614061dd298283f86351079ef903bf0d4410a44ea",
            [
                ("0x45d45e6ff99e6c34a235d263965910298985fcfe", "https://in3-v2.slock.it/goerli/nd-1"),
                ("0x1fe2e9bf29aa1938859af64c413361227d04059a", "https://in3-v2.slock.it/goerli/nd-2"),
            ],
        ),
    ]
});
