//! # Incubed Client Service
//!
//! Application service: chain selection, configuration, and the
//! validate-then-delegate flow of every operation.
//!
//! ## Concurrency
//!
//! Each operation makes at most one blocking runtime call and holds no lock
//! of its own. Calling one client from several threads is exactly as safe as
//! the runtime behind it; this layer adds no guarantee of its own.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::algorithms::{node_list_from_wire, validate_encoded_value, validate_signature};
use crate::config::ClientConfig;
use crate::domain::{
    Account, ChainConfig, ConfigurationError, In3Error, In3Result, NodeList, RuntimeError,
    SUPPORTED_CHAINS,
};
use crate::ports::{In3Api, In3Runtime, RuntimeMethod, TypedRuntime};

/// Chain the client binds to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainSelector {
    /// One of the fixed chain names.
    Name(String),
    /// A full chain description, bypassing the name check.
    Config(ChainConfig),
}

impl Default for ChainSelector {
    fn default() -> Self {
        ChainSelector::Name("mainnet".to_string())
    }
}

impl From<&str> for ChainSelector {
    fn from(name: &str) -> Self {
        ChainSelector::Name(name.to_string())
    }
}

impl From<String> for ChainSelector {
    fn from(name: String) -> Self {
        ChainSelector::Name(name)
    }
}

impl From<ChainConfig> for ChainSelector {
    fn from(chain: ChainConfig) -> Self {
        ChainSelector::Config(chain)
    }
}

impl From<&ChainConfig> for ChainSelector {
    fn from(chain: &ChainConfig) -> Self {
        ChainSelector::Config(chain.clone())
    }
}

impl ChainSelector {
    /// Resolve to a chain and the configuration to apply, if any.
    ///
    /// A full chain description brings its own client configuration, which
    /// replaces `config`.
    pub fn resolve(
        self,
        config: Option<ClientConfig>,
    ) -> Result<(ChainConfig, Option<ClientConfig>), ConfigurationError> {
        match self {
            ChainSelector::Name(name) => {
                let chain = SUPPORTED_CHAINS
                    .contains(&name.as_str())
                    .then(|| ChainConfig::by_name(&name))
                    .flatten()
                    .ok_or(ConfigurationError::UnsupportedChain(name))?;
                Ok((chain.clone(), config))
            }
            ChainSelector::Config(chain) => {
                let embedded = chain.client_config.clone();
                Ok((chain, Some(embedded)))
            }
        }
    }
}

/// Lifecycle of a client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientState {
    /// Chain resolved, no configuration applied.
    Unconfigured,
    /// Configuration accepted by the runtime.
    Configured,
    /// Construction finished; operations may be called.
    Ready,
}

/// Incubed client - validates input and delegates to the runtime.
pub struct In3Client<R: In3Runtime> {
    /// Bound chain.
    chain: ChainConfig,
    /// Last configuration the runtime accepted.
    applied: Option<ClientConfig>,
    /// External runtime.
    runtime: R,
    /// Lifecycle state.
    state: ClientState,
}

impl<R: In3Runtime> In3Client<R> {
    /// Create a client over an existing runtime.
    ///
    /// A configuration, if any, is applied before this returns; a failure
    /// aborts construction.
    pub fn new(
        chain: impl Into<ChainSelector>,
        config: Option<ClientConfig>,
        runtime: R,
    ) -> In3Result<Self> {
        let (chain, config) = chain.into().resolve(config)?;
        Self::build(chain, config, runtime)
    }

    /// Create a client whose runtime is built for the resolved chain.
    pub fn connect<F>(
        chain: impl Into<ChainSelector>,
        config: Option<ClientConfig>,
        make_runtime: F,
    ) -> In3Result<Self>
    where
        F: FnOnce(&ChainConfig) -> R,
    {
        let (chain, config) = chain.into().resolve(config)?;
        let runtime = make_runtime(&chain);
        Self::build(chain, config, runtime)
    }

    fn build(chain: ChainConfig, config: Option<ClientConfig>, runtime: R) -> In3Result<Self> {
        let mut client = Self {
            chain,
            applied: None,
            runtime,
            state: ClientState::Unconfigured,
        };

        if let Some(config) = config {
            client.apply_config(config)?;
        }
        client.state = ClientState::Ready;

        info!(
            chain = %client.chain.name,
            chain_id = %client.chain.chain_id_hex(),
            configured = client.applied.is_some(),
            "Incubed client ready"
        );
        Ok(client)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ClientState {
        self.state
    }

    /// Last configuration the runtime accepted through this client.
    pub fn applied_config(&self) -> Option<&ClientConfig> {
        self.applied.as_ref()
    }

    /// Runtime handle.
    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    fn apply_config(&mut self, config: ClientConfig) -> Result<(), ConfigurationError> {
        config.validate()?;
        let params = config.to_transport_params()?;

        let accepted = self
            .dispatch(RuntimeMethod::Configure, 1, |rt| rt.configure(params))
            .map_err(ConfigurationError::Runtime)?;
        if !accepted {
            warn!(chain = %self.chain.name, "Runtime rejected the configuration");
            return Err(ConfigurationError::Rejected);
        }

        self.applied = Some(config);
        if self.state == ClientState::Unconfigured {
            self.state = ClientState::Configured;
        }
        info!(chain = %self.chain.name, "Client configuration applied");
        Ok(())
    }

    /// Internal: one runtime call with boundary logging.
    fn dispatch<T>(
        &self,
        method: RuntimeMethod,
        arg_count: usize,
        call: impl FnOnce(&R) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        debug!(
            method = method.wire_name(),
            args = arg_count,
            chain = %self.chain.name,
            "Calling runtime"
        );
        call(&self.runtime).inspect_err(|e| {
            warn!(method = method.wire_name(), error = %e, "Runtime call failed");
        })
    }
}

impl<R: In3Runtime> In3Api for In3Client<R> {
    fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    fn configure(&mut self, config: &ClientConfig) -> In3Result<()> {
        Ok(self.apply_config(config.clone())?)
    }

    fn get_node_list(&self) -> In3Result<NodeList> {
        let record = self.dispatch(RuntimeMethod::NodeList, 0, |rt| rt.node_list())?;
        Ok(node_list_from_wire(&Value::Object(record))?)
    }

    fn abi_encode(&self, signature: &str, args: &[Value]) -> In3Result<String> {
        validate_signature(signature)?;
        let encoded = self.dispatch(RuntimeMethod::AbiEncode, 2, |rt| {
            rt.abi_encode(signature, args.to_vec())
        })?;
        Ok(encoded)
    }

    fn abi_decode(&self, signature: &str, encoded: &str) -> In3Result<Vec<Value>> {
        validate_encoded_value(encoded)?;
        validate_signature(signature)?;
        let decoded = self.dispatch(RuntimeMethod::AbiDecode, 2, |rt| {
            rt.abi_decode(signature, encoded)
        })?;
        Ok(decoded)
    }

    fn get_config(&self) -> In3Result<ClientConfig> {
        Err(In3Error::NotImplemented("get_config"))
    }

    fn ens_resolve(&self, _name: &str) -> In3Result<Account> {
        Err(In3Error::NotImplemented("ens_resolve"))
    }
}
