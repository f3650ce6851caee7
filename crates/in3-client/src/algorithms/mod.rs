//! # Algorithms Module
//!
//! Signature checks, wire coercion and the entity factory.

pub mod coercion;
pub mod factory;
pub mod signature;

pub use factory::{
    deserialize, node_from_wire, node_list_from_wire, Coercion, EntityConverter, FieldValue,
    PrimitiveKind, Record, Schema, NODE_LIST_SCHEMA, NODE_SCHEMA,
};
pub use signature::{
    validate_encoded_value, validate_signature, AbiSignature, ABI_WORD_HEX_LEN, RECOGNIZED_TYPES,
};
