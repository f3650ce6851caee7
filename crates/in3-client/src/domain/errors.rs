//! # Domain Errors
//!
//! Error taxonomy for the Incubed client layer.
//!
//! Every failure surfaces synchronously as one of these values. Nothing is
//! retried or swallowed at this layer.

use thiserror::Error;

/// Result alias used by the client façade.
pub type In3Result<T> = Result<T, In3Error>;

/// Malformed input rejected before any runtime call is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Signature has no parenthesized group or no recognized ABI type.
    #[error("Function signature is not valid. A valid example is balanceOf(address).")]
    InvalidSignature {
        /// The rejected signature text
        signature: String,
    },

    /// Encoded value does not carry the `0x` prefix.
    #[error("Encoded values must start with 0x")]
    MissingHexPrefix,

    /// Encoded payload holds no ABI word beyond the offset/length header.
    #[error("Encoded values must be longer than 64 characters")]
    EncodedValueTooShort {
        /// Payload length in characters, prefix excluded
        length: usize,
    },
}

/// A wire field failed its declared coercion.
///
/// The enclosing entity is discarded; partial entities are never returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// Schema field absent (or `null`) in the raw record.
    #[error("{entity}: missing required field `{field}`")]
    MissingField {
        /// Entity being built
        entity: &'static str,
        /// Missing field name
        field: &'static str,
    },

    /// Raw value could not be converted to the declared type.
    #[error("{entity}: field `{field}` is invalid ({reason}): {raw}")]
    InvalidValue {
        /// Entity being built
        entity: &'static str,
        /// Offending field name
        field: &'static str,
        /// Why the conversion failed
        reason: String,
        /// Raw wire value, rendered as JSON
        raw: String,
    },

    /// Raw record is not a JSON object.
    #[error("{entity}: expected an object, got {raw}")]
    NotAnObject {
        /// Entity being built
        entity: &'static str,
        /// Raw wire value, rendered as JSON
        raw: String,
    },

    /// Builder asked for a field with a different coercion than its schema declares.
    #[error("{entity}: field `{field}` was not declared as {expected}")]
    SchemaMismatch {
        /// Entity being built
        entity: &'static str,
        /// Field name
        field: &'static str,
        /// Kind the builder expected
        expected: &'static str,
    },
}

/// Failure of the external runtime call itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Runtime reported an error object for the call.
    #[error("{method} failed with code {code}: {message}")]
    Rpc {
        /// Wire method name
        method: &'static str,
        /// Error code reported by the runtime
        code: i64,
        /// Error message reported by the runtime
        message: String,
    },

    /// Runtime could not be reached.
    #[error("{method} transport failure: {message}")]
    Transport {
        /// Wire method name
        method: &'static str,
        /// Transport error text
        message: String,
    },

    /// Call arguments could not be rendered to the wire form.
    #[error("{method} request could not be rendered: {detail}")]
    MalformedRequest {
        /// Wire method name
        method: &'static str,
        /// Rendering error text
        detail: String,
    },

    /// Response could not be parsed as a runtime reply.
    #[error("{method} returned a malformed response: {detail}")]
    MalformedResponse {
        /// Wire method name
        method: &'static str,
        /// Parse error text
        detail: String,
    },

    /// Response parsed but has the wrong shape for the method.
    #[error("{method} returned an unexpected result: expected {expected}, got {raw}")]
    UnexpectedResult {
        /// Wire method name
        method: &'static str,
        /// Shape the method promises
        expected: &'static str,
        /// Raw result, rendered as JSON
        raw: String,
    },
}

/// Invalid chain selector or failed configuration.
///
/// Fatal to client construction; never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Chain name outside the fixed vocabulary.
    #[error("Chain name not supported: {0}. Try mainnet, kovan, goerli.")]
    UnsupportedChain(String),

    /// Client configuration failed local validation or serialization.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Runtime answered the configure call with a failure indicator.
    #[error("Runtime rejected the configuration")]
    Rejected,

    /// The configure call itself failed.
    #[error("Configure call failed: {0}")]
    Runtime(#[source] RuntimeError),
}

/// Façade-level error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum In3Error {
    /// Chain selection or configuration failure.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Local input validation failure.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Typed deserialization failure.
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// External runtime call failure, propagated unchanged.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Operation not provided by this layer.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}
