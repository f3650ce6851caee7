//! # Outbound Ports
//!
//! The runtime boundary: one synchronous call keyed by a closed set of
//! methods.
//!
//! The runtime owns proof verification, node selection and request dispatch.
//! This layer only shapes the call and checks the shape of the result.

use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::domain::RuntimeError;

/// Methods the runtime answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuntimeMethod {
    /// Apply a client configuration.
    Configure,
    /// Read the current node registry.
    NodeList,
    /// ABI-encode a call.
    AbiEncode,
    /// ABI-decode a result.
    AbiDecode,
}

impl RuntimeMethod {
    /// Every method, in declaration order.
    pub const ALL: [RuntimeMethod; 4] = [
        RuntimeMethod::Configure,
        RuntimeMethod::NodeList,
        RuntimeMethod::AbiEncode,
        RuntimeMethod::AbiDecode,
    ];

    /// Method name on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            RuntimeMethod::Configure => "in3_config",
            RuntimeMethod::NodeList => "in3_nodeList",
            RuntimeMethod::AbiEncode => "in3_abiEncode",
            RuntimeMethod::AbiDecode => "in3_abiDecode",
        }
    }
}

/// One runtime call with its typed arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum RuntimeCall {
    /// `params` is the already-rendered argument list.
    Configure {
        /// Rendered argument list
        params: String,
    },
    /// No arguments.
    NodeList,
    /// Signature plus positional arguments, passed through untouched.
    AbiEncode {
        /// Function signature
        signature: String,
        /// Positional arguments
        args: Vec<Value>,
    },
    /// Signature plus the `0x`-prefixed payload.
    AbiDecode {
        /// Function signature
        signature: String,
        /// Encoded value
        encoded: String,
    },
}

impl RuntimeCall {
    /// Method this call targets.
    pub fn method(&self) -> RuntimeMethod {
        match self {
            RuntimeCall::Configure { .. } => RuntimeMethod::Configure,
            RuntimeCall::NodeList => RuntimeMethod::NodeList,
            RuntimeCall::AbiEncode { .. } => RuntimeMethod::AbiEncode,
            RuntimeCall::AbiDecode { .. } => RuntimeMethod::AbiDecode,
        }
    }

    /// Whether the arguments are already rendered to the wire form.
    pub fn is_formatted(&self) -> bool {
        matches!(self, RuntimeCall::Configure { .. })
    }

    /// Number of positional arguments.
    pub fn arg_count(&self) -> usize {
        match self {
            RuntimeCall::Configure { .. } => 1,
            RuntimeCall::NodeList => 0,
            RuntimeCall::AbiEncode { .. } | RuntimeCall::AbiDecode { .. } => 2,
        }
    }

    /// Positional arguments as JSON values.
    ///
    /// Formatted calls have no value form; use the rendered string instead.
    pub fn params(&self) -> Vec<Value> {
        match self {
            RuntimeCall::Configure { .. } | RuntimeCall::NodeList => Vec::new(),
            RuntimeCall::AbiEncode { signature, args } => {
                vec![Value::String(signature.clone()), Value::Array(args.clone())]
            }
            RuntimeCall::AbiDecode { signature, encoded } => vec![
                Value::String(signature.clone()),
                Value::String(encoded.clone()),
            ],
        }
    }
}

/// External runtime - outbound port.
///
/// Implementations decide their own thread-safety; callers inherit it.
pub trait In3Runtime: Send + Sync {
    /// Perform one blocking call.
    fn call(&self, call: RuntimeCall) -> Result<Value, RuntimeError>;
}

impl<R: In3Runtime + ?Sized> In3Runtime for Arc<R> {
    fn call(&self, call: RuntimeCall) -> Result<Value, RuntimeError> {
        (**self).call(call)
    }
}

impl<R: In3Runtime + ?Sized> In3Runtime for Box<R> {
    fn call(&self, call: RuntimeCall) -> Result<Value, RuntimeError> {
        (**self).call(call)
    }
}

/// Typed results on top of [`In3Runtime::call`].
pub trait TypedRuntime: In3Runtime {
    /// `in3_config`: success indicator.
    fn configure(&self, params: String) -> Result<bool, RuntimeError> {
        match self.call(RuntimeCall::Configure { params })? {
            Value::Bool(ok) => Ok(ok),
            other => Err(unexpected(RuntimeMethod::Configure, "a boolean", &other)),
        }
    }

    /// `in3_nodeList`: untyped node list record.
    fn node_list(&self) -> Result<Map<String, Value>, RuntimeError> {
        match self.call(RuntimeCall::NodeList)? {
            Value::Object(record) => Ok(record),
            other => Err(unexpected(RuntimeMethod::NodeList, "an object", &other)),
        }
    }

    /// `in3_abiEncode`: `0x`-prefixed hex string.
    fn abi_encode(&self, signature: &str, args: Vec<Value>) -> Result<String, RuntimeError> {
        let call = RuntimeCall::AbiEncode {
            signature: signature.to_string(),
            args,
        };
        match self.call(call)? {
            Value::String(hex) if hex.starts_with("0x") => Ok(hex),
            other => Err(unexpected(RuntimeMethod::AbiEncode, "a 0x hex string", &other)),
        }
    }

    /// `in3_abiDecode`: decoded values; a scalar result is one value.
    fn abi_decode(&self, signature: &str, encoded: &str) -> Result<Vec<Value>, RuntimeError> {
        let call = RuntimeCall::AbiDecode {
            signature: signature.to_string(),
            encoded: encoded.to_string(),
        };
        match self.call(call)? {
            Value::Array(values) => Ok(values),
            Value::Null => Err(unexpected(RuntimeMethod::AbiDecode, "decoded values", &Value::Null)),
            scalar => Ok(vec![scalar]),
        }
    }
}

impl<R: In3Runtime + ?Sized> TypedRuntime for R {}

fn unexpected(method: RuntimeMethod, expected: &'static str, raw: &Value) -> RuntimeError {
    RuntimeError::UnexpectedResult {
        method: method.wire_name(),
        expected,
        raw: raw.to_string(),
    }
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock runtime for testing.
///
/// Scripted replies are consumed per method, first in first out. Without a
/// script the mock answers with defaults: configure succeeds, the node list
/// is `node_list_reply`, encode renders the arguments as `0x` + hex of their JSON,
/// decode reverses that.
#[derive(Default)]
pub struct MockRuntime {
    /// Default node list record.
    pub node_list_reply: Value,
    /// Fail every call with a transport error?
    pub should_fail: bool,
    scripted: Mutex<HashMap<RuntimeMethod, VecDeque<Result<Value, RuntimeError>>>>,
    calls: Mutex<Vec<RuntimeCall>>,
}

impl MockRuntime {
    /// Mock answering `in3_nodeList` with `record`.
    pub fn with_node_list(record: Value) -> Self {
        Self {
            node_list_reply: record,
            ..Default::default()
        }
    }

    /// Mock failing every call with a transport error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    /// Queue a reply for the next call to `method`.
    pub fn push_reply(&self, method: RuntimeMethod, reply: Result<Value, RuntimeError>) {
        self.scripted
            .lock()
            .entry(method)
            .or_default()
            .push_back(reply);
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.calls.lock().clone()
    }

    /// Number of calls received for `method`.
    pub fn call_count(&self, method: RuntimeMethod) -> usize {
        self.calls.lock().iter().filter(|c| c.method() == method).count()
    }

    fn default_reply(&self, call: &RuntimeCall) -> Result<Value, RuntimeError> {
        match call {
            RuntimeCall::Configure { .. } => Ok(Value::Bool(true)),
            RuntimeCall::NodeList => Ok(self.node_list_reply.clone()),
            RuntimeCall::AbiEncode { args, .. } => {
                let json = Value::Array(args.clone()).to_string();
                Ok(Value::String(format!("0x{}", hex::encode(json))))
            }
            RuntimeCall::AbiDecode { encoded, .. } => {
                let method = RuntimeMethod::AbiDecode.wire_name();
                let bytes = hex::decode(encoded.trim_start_matches("0x")).map_err(|e| {
                    RuntimeError::Rpc {
                        method,
                        code: -32602,
                        message: e.to_string(),
                    }
                })?;
                serde_json::from_slice(&bytes).map_err(|e| RuntimeError::Rpc {
                    method,
                    code: -32602,
                    message: e.to_string(),
                })
            }
        }
    }
}

impl In3Runtime for MockRuntime {
    fn call(&self, call: RuntimeCall) -> Result<Value, RuntimeError> {
        self.calls.lock().push(call.clone());
        let method = call.method();

        if self.should_fail {
            return Err(RuntimeError::Transport {
                method: method.wire_name(),
                message: "Mock failure".to_string(),
            });
        }

        let scripted = self
            .scripted
            .lock()
            .get_mut(&method)
            .and_then(VecDeque::pop_front);
        match scripted {
            Some(reply) => reply,
            None => self.default_reply(&call),
        }
    }
}
