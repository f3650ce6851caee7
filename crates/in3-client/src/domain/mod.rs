//! # Domain Module
//!
//! Core domain types: chains, registry entities, account ids, errors.

pub mod chain;
pub mod entities;
pub mod errors;
pub mod value_objects;

pub use chain::*;
pub use entities::*;
pub use errors::*;
pub use value_objects::*;
