//! # Fake Incubed Node
//!
//! A scripted JSON-RPC endpoint used as the [`Transport`] of a real
//! [`JsonRpcRuntime`]. It answers the four runtime methods, records every
//! request, and can be told to reject configuration or fail a method.
//!
//! ABI calls are answered with a reversible stand-in encoding: `0x` + hex of
//! the JSON argument list. Enough to check that arguments pass the boundary
//! untouched, nothing more.

use in3_client::Transport;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry used by default: two of five servers visible.
pub fn registry_record() -> Value {
    json!({
        "nodes": [
            node_record("0x45d45e6ff99e6c34a235d263965910298985fcfe", 0, "20000000000000000000"),
            node_record("0x1fe2e9bf29aa1938859af64c413361227d04059a", 1, "0x1158e460913d00000"),
        ],
        "contract": "0xac1b824795e1eb1f6e609fe0da9b9af8beaab60f",
        "registryId": "0x23d5345c5c13180a8080bd5ddbe7cde64683755dcce6e734d95b7b573845facb",
        "lastBlockNumber": 8669495,
        "totalServers": 5,
        "capacity": 10
    })
}

/// One registry node record as the runtime reports it.
pub fn node_record(address: &str, index: u64, deposit: &str) -> Value {
    json!({
        "url": format!("https://in3-v2.slock.it/mainnet/nd-{}", index + 1),
        "address": address,
        "index": index,
        "deposit": deposit,
        "props": "0x1dd",
        "timeout": 3456000,
        "registerTime": 1576224418,
        "weight": 2000,
        "chainIds": ["0x1"]
    })
}

#[derive(Default)]
struct Inner {
    node_list: Mutex<Value>,
    reject_config: Mutex<bool>,
    failures: Mutex<HashMap<String, (i64, String)>>,
    requests: Mutex<Vec<Value>>,
}

/// Cloneable handle on a fake node; clones share state.
#[derive(Clone, Default)]
pub struct FakeNode {
    inner: Arc<Inner>,
}

impl FakeNode {
    /// Fake node serving [`registry_record`].
    pub fn new() -> Self {
        Self::with_node_list(registry_record())
    }

    /// Fake node serving `record` for `in3_nodeList`.
    pub fn with_node_list(record: Value) -> Self {
        let node = Self::default();
        *node.inner.node_list.lock() = record;
        node
    }

    /// Answer `in3_config` with `false`.
    pub fn reject_config(&self) {
        *self.inner.reject_config.lock() = true;
    }

    /// Answer `method` with a JSON-RPC error object.
    pub fn fail(&self, method: &str, code: i64, message: &str) {
        self.inner
            .failures
            .lock()
            .insert(method.to_string(), (code, message.to_string()));
    }

    /// Every request received, parsed.
    pub fn requests(&self) -> Vec<Value> {
        self.inner.requests.lock().clone()
    }

    /// Methods of the requests received, in order.
    pub fn methods(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|r| r["method"].as_str().map(str::to_string))
            .collect()
    }

    fn answer(&self, method: &str, params: &Value) -> Result<Value, (i64, String)> {
        if let Some(failure) = self.inner.failures.lock().get(method) {
            return Err(failure.clone());
        }

        match method {
            "in3_config" => Ok(Value::Bool(!*self.inner.reject_config.lock())),
            "in3_nodeList" => Ok(self.inner.node_list.lock().clone()),
            "in3_abiEncode" => Ok(Value::String(format!(
                "0x{}",
                hex::encode(params[1].to_string())
            ))),
            "in3_abiDecode" => {
                let payload = params[1]
                    .as_str()
                    .and_then(|s| s.strip_prefix("0x"))
                    .ok_or((-32602, "expected 0x payload".to_string()))?;
                let bytes = hex::decode(payload).map_err(|e| (-32602, e.to_string()))?;
                serde_json::from_slice(&bytes).map_err(|e| (-32602, e.to_string()))
            }
            other => Err((-32601, format!("method {other} not found"))),
        }
    }
}

impl Transport for FakeNode {
    fn send(&self, request: &str) -> Result<String, String> {
        let request: Value = serde_json::from_str(request).map_err(|e| e.to_string())?;
        self.inner.requests.lock().push(request.clone());

        let method = request["method"].as_str().unwrap_or_default();
        let reply = match self.answer(method, &request["params"]) {
            Ok(result) => json!({"jsonrpc": "2.0", "id": request["id"], "result": result}),
            Err((code, message)) => json!({
                "jsonrpc": "2.0",
                "id": request["id"],
                "error": {"code": code, "message": message}
            }),
        };
        Ok(reply.to_string())
    }
}
