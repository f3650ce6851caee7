//! # Client Configuration
//!
//! Runtime-facing configuration handed to the `in3_config` call.
//!
//! Every field is optional; an absent field leaves the runtime default in
//! place. Nothing here is enforced locally (timeouts included), the values
//! are only validated for obvious nonsense and passed through.

use serde::{Deserialize, Serialize};

use crate::domain::{chain_id, ChainId, ConfigurationError};

/// How much verification the runtime requests from nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofLevel {
    /// No proof.
    None,
    /// Proof of the result only.
    Standard,
    /// Proof including every touched account.
    Full,
}

/// Incubed client configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Chain the client talks to.
    #[serde(with = "chain_id_serde", skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<ChainId>,

    /// Refresh the node list when a newer registry block is reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_update_list: Option<bool>,

    /// Nodes asked per request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_count: Option<u32>,

    /// Signatures requested for each block hash.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_count: Option<u32>,

    /// Minimum deposit a node needs to be selected, in wei.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_deposit: Option<u64>,

    /// Upper bound on the locally kept node list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_limit: Option<u32>,

    /// Blocks on top of a block before it counts as final.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finality: Option<u32>,

    /// Distance from the head used when `latest` is requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_latest_block: Option<u32>,

    /// Verification level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<ProofLevel>,

    /// Ask nodes to include contract code in proofs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_code: Option<bool>,

    /// Keep the `in3` section of responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_in3: Option<bool>,

    /// Attempts per request before giving up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,

    /// Blocks kept in the runtime cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_block_cache: Option<u32>,

    /// Contract codes kept in the runtime cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_code_cache: Option<u32>,

    /// Request timeout in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Plain RPC endpoint, bypassing the node list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc: Option<String>,
}

impl ClientConfig {
    /// Configuration bound to a chain, everything else left to the runtime.
    pub fn for_chain(chain_id: ChainId) -> Self {
        Self {
            chain_id: Some(chain_id),
            ..Default::default()
        }
    }

    /// Create a config for testing (single node, no proof, short timeout).
    pub fn for_testing() -> Self {
        Self {
            chain_id: Some(chain_id::LOCAL),
            auto_update_list: Some(false),
            request_count: Some(1),
            signature_count: Some(0),
            proof: Some(ProofLevel::None),
            max_attempts: Some(1),
            timeout: Some(5_000),
            ..Default::default()
        }
    }

    /// Parse a configuration from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::InvalidConfig(e.to_string()))
    }

    /// Reject values no runtime could honor.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.request_count == Some(0) {
            return Err(ConfigurationError::InvalidConfig(
                "requestCount must be at least 1".to_string(),
            ));
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigurationError::InvalidConfig(
                "maxAttempts must be at least 1".to_string(),
            ));
        }
        if matches!(&self.rpc, Some(url) if url.trim().is_empty()) {
            return Err(ConfigurationError::InvalidConfig(
                "rpc must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Render the already-formatted argument list of the configure call.
    ///
    /// The list holds one element, the serialized config, with every `'`
    /// removed. This is a transport quirk, not escaping.
    pub fn to_transport_params(&self) -> Result<String, ConfigurationError> {
        let json = serde_json::to_string(self)
            .map_err(|e| ConfigurationError::InvalidConfig(e.to_string()))?;
        Ok(format!("[{}]", json.replace('\'', "")))
    }
}

/// `chainId` travels as `0x`-hex; a number or a chain name is accepted too.
mod chain_id_serde {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    use crate::algorithms::coercion::parse_u64;
    use crate::domain::{chain_id, ChainId};

    pub fn serialize<S: Serializer>(id: &Option<ChainId>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.serialize_str(&format!("0x{id:x}")),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ChainId>, D::Error> {
        deserializer.deserialize_any(ChainIdVisitor)
    }

    struct ChainIdVisitor;

    impl<'de> Visitor<'de> for ChainIdVisitor {
        type Value = Option<ChainId>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a chain id as number, hex string or chain name")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            u64::try_from(v)
                .map(Some)
                .map_err(|_| E::custom("chain id must not be negative"))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let named = match v {
                "mainnet" => Some(chain_id::MAINNET),
                "kovan" => Some(chain_id::KOVAN),
                "goerli" => Some(chain_id::GOERLI),
                "ipfs" => Some(chain_id::IPFS),
                "local" => Some(chain_id::LOCAL),
                _ => None,
            };
            match named {
                Some(id) => Ok(Some(id)),
                None => parse_u64(v).map(Some).map_err(E::custom),
            }
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(ChainIdVisitor)
        }
    }
}
