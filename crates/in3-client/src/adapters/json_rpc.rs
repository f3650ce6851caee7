//! JSON-RPC runtime adapter.
//!
//! Renders each [`RuntimeCall`] as a JSON-RPC 2.0 request and hands it to a
//! blocking [`Transport`]. The chain binding travels in the `in3` section of
//! every request.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

use crate::domain::{ChainId, RuntimeError};
use crate::ports::{In3Runtime, RuntimeCall};

/// Blocking request/response channel to a runtime endpoint.
pub trait Transport: Send + Sync {
    /// Send one rendered request and return the raw response body.
    fn send(&self, request: &str) -> Result<String, String>;
}

impl<F> Transport for F
where
    F: Fn(&str) -> Result<String, String> + Send + Sync,
{
    fn send(&self, request: &str) -> Result<String, String> {
        self(request)
    }
}

/// JSON-RPC request structure.
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: &'a RawValue,
    id: u64,
    in3: In3Section,
}

/// Per-request Incubed metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct In3Section {
    chain_id: String,
}

/// JSON-RPC response structure.
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    id: Option<u64>,
    #[serde(default)]
    result: Value,
    error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Runtime reached through JSON-RPC over a [`Transport`].
pub struct JsonRpcRuntime<T: Transport> {
    transport: T,
    chain_id: ChainId,
    request_id: AtomicU64,
}

impl<T: Transport> JsonRpcRuntime<T> {
    /// Create a runtime bound to `chain_id`.
    pub fn new(transport: T, chain_id: ChainId) -> Self {
        Self {
            transport,
            chain_id,
            request_id: AtomicU64::new(1),
        }
    }

    /// Chain every request is bound to.
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn render(&self, call: &RuntimeCall, id: u64) -> Result<String, RuntimeError> {
        let method = call.method().wire_name();
        let malformed = |detail: String| RuntimeError::MalformedRequest { method, detail };

        let params = match call {
            RuntimeCall::Configure { params } => params.clone(),
            other => serde_json::to_string(&other.params()).map_err(|e| malformed(e.to_string()))?,
        };
        let params = RawValue::from_string(params).map_err(|e| malformed(e.to_string()))?;

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params: &params,
            id,
            in3: In3Section {
                chain_id: format!("0x{:x}", self.chain_id),
            },
        };
        serde_json::to_string(&request).map_err(|e| malformed(e.to_string()))
    }
}

impl<T: Transport> In3Runtime for JsonRpcRuntime<T> {
    fn call(&self, call: RuntimeCall) -> Result<Value, RuntimeError> {
        let method = call.method().wire_name();
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = self.render(&call, id)?;
        trace!(method, id, "Sending runtime request");

        let body = self
            .transport
            .send(&request)
            .map_err(|message| RuntimeError::Transport { method, message })?;

        let response: JsonRpcResponse =
            serde_json::from_str(&body).map_err(|e| RuntimeError::MalformedResponse {
                method,
                detail: e.to_string(),
            })?;

        if let Some(error) = response.error {
            return Err(RuntimeError::Rpc {
                method,
                code: error.code,
                message: error.message,
            });
        }

        if response.id != Some(id) {
            return Err(RuntimeError::MalformedResponse {
                method,
                detail: format!("response id {:?} does not match request id {id}", response.id),
            });
        }

        Ok(response.result)
    }
}
