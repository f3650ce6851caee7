//! # Deserialization Factory
//!
//! Turns untyped wire records into typed entities.
//!
//! Each entity declares a [`Schema`]: field name to [`Coercion`]. The generic
//! step ([`deserialize`]) walks the schema, not the record, so fields the
//! schema does not name are dropped. List-valued fields pass through as raw
//! values; the entity builder maps the element coercion over them before the
//! entity is assembled.

use primitive_types::U256;
use serde_json::Value;
use std::collections::HashMap;
use tracing::trace;

use super::coercion::{to_account, to_text, to_u256, to_u64};
use crate::domain::{Account, CoercionError, Node, NodeList};

/// Maximum length of a raw value quoted in an error.
const MAX_RAW_IN_ERROR: usize = 120;

/// Built-in scalar coercions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// Text, numbers and booleans rendered.
    Text,
    /// Unsigned 64-bit integer.
    Integer,
    /// Unsigned 256-bit integer.
    BigInteger,
    /// Raw sequence, expanded by the entity builder.
    List,
}

impl PrimitiveKind {
    fn apply(self, value: &Value) -> Result<FieldValue, String> {
        match self {
            PrimitiveKind::Text => to_text(value).map(FieldValue::Text),
            PrimitiveKind::Integer => to_u64(value).map(FieldValue::Integer),
            PrimitiveKind::BigInteger => to_u256(value).map(FieldValue::BigInteger),
            PrimitiveKind::List => match value {
                Value::Array(items) => Ok(FieldValue::List(items.clone())),
                _ => Err("expected a list".to_string()),
            },
        }
    }
}

/// Converter producing a nested entity from one wire value.
pub type EntityConverter = fn(&Value) -> Result<FieldValue, String>;

/// Declared coercion for one schema field.
#[derive(Clone, Copy, Debug)]
pub enum Coercion {
    /// Built-in scalar coercion.
    Primitive(PrimitiveKind),
    /// Nested entity converter.
    Nested(EntityConverter),
}

impl Coercion {
    /// Apply to one wire value.
    pub fn apply(&self, value: &Value) -> Result<FieldValue, String> {
        match self {
            Coercion::Primitive(kind) => kind.apply(value),
            Coercion::Nested(convert) => convert(value),
        }
    }
}

/// A converted field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// Text value.
    Text(String),
    /// 64-bit integer.
    Integer(u64),
    /// 256-bit integer.
    BigInteger(U256),
    /// Account identifier.
    Account(Account),
    /// Unexpanded sequence.
    List(Vec<Value>),
}

/// Field-to-coercion mapping for one entity.
#[derive(Clone, Copy, Debug)]
pub struct Schema {
    /// Entity name used in errors.
    pub entity: &'static str,
    /// Declared fields, in declaration order.
    pub fields: &'static [(&'static str, Coercion)],
}

/// Converter for account-valued fields.
pub fn account_field(value: &Value) -> Result<FieldValue, String> {
    to_account(value).map(FieldValue::Account)
}

/// Schema of a registry node record.
pub const NODE_SCHEMA: Schema = Schema {
    entity: "Node",
    fields: &[
        ("url", Coercion::Primitive(PrimitiveKind::Text)),
        ("address", Coercion::Nested(account_field)),
        ("index", Coercion::Primitive(PrimitiveKind::Integer)),
        ("deposit", Coercion::Primitive(PrimitiveKind::BigInteger)),
        ("props", Coercion::Primitive(PrimitiveKind::Text)),
        ("timeout", Coercion::Primitive(PrimitiveKind::Integer)),
        ("registerTime", Coercion::Primitive(PrimitiveKind::Integer)),
        ("weight", Coercion::Primitive(PrimitiveKind::Integer)),
    ],
};

/// Schema of a node list record.
pub const NODE_LIST_SCHEMA: Schema = Schema {
    entity: "NodeList",
    fields: &[
        ("nodes", Coercion::Primitive(PrimitiveKind::List)),
        ("contract", Coercion::Nested(account_field)),
        ("registryId", Coercion::Primitive(PrimitiveKind::Text)),
        ("lastBlockNumber", Coercion::Primitive(PrimitiveKind::Integer)),
        ("totalServers", Coercion::Primitive(PrimitiveKind::Integer)),
    ],
};

/// Converted fields of one entity, consumed by its builder.
#[derive(Debug)]
pub struct Record {
    entity: &'static str,
    fields: HashMap<&'static str, FieldValue>,
}

impl Record {
    /// Entity name.
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Number of converted fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field was converted.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether a field was converted.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Take a text field.
    pub fn take_text(&mut self, field: &'static str) -> Result<String, CoercionError> {
        match self.take(field)? {
            FieldValue::Text(v) => Ok(v),
            _ => Err(self.mismatch(field, "text")),
        }
    }

    /// Take a 64-bit integer field.
    pub fn take_integer(&mut self, field: &'static str) -> Result<u64, CoercionError> {
        match self.take(field)? {
            FieldValue::Integer(v) => Ok(v),
            _ => Err(self.mismatch(field, "an integer")),
        }
    }

    /// Take a 256-bit integer field.
    pub fn take_big_integer(&mut self, field: &'static str) -> Result<U256, CoercionError> {
        match self.take(field)? {
            FieldValue::BigInteger(v) => Ok(v),
            _ => Err(self.mismatch(field, "a big integer")),
        }
    }

    /// Take an account field.
    pub fn take_account(&mut self, field: &'static str) -> Result<Account, CoercionError> {
        match self.take(field)? {
            FieldValue::Account(v) => Ok(v),
            _ => Err(self.mismatch(field, "an account")),
        }
    }

    /// Take an unexpanded list field.
    pub fn take_list(&mut self, field: &'static str) -> Result<Vec<Value>, CoercionError> {
        match self.take(field)? {
            FieldValue::List(v) => Ok(v),
            _ => Err(self.mismatch(field, "a list")),
        }
    }

    fn take(&mut self, field: &'static str) -> Result<FieldValue, CoercionError> {
        self.fields
            .remove(field)
            .ok_or(CoercionError::MissingField {
                entity: self.entity,
                field,
            })
    }

    fn mismatch(&self, field: &'static str, expected: &'static str) -> CoercionError {
        CoercionError::SchemaMismatch {
            entity: self.entity,
            field,
            expected,
        }
    }
}

/// Convert every schema field of a raw record.
///
/// A missing (or `null`) field, or a value failing its coercion, aborts the
/// whole record.
pub fn deserialize(raw: &Value, schema: &Schema) -> Result<Record, CoercionError> {
    let object = raw.as_object().ok_or_else(|| CoercionError::NotAnObject {
        entity: schema.entity,
        raw: render_raw(raw),
    })?;

    let mut fields = HashMap::with_capacity(schema.fields.len());
    for (name, coercion) in schema.fields {
        let value = match object.get(*name) {
            None | Some(Value::Null) => {
                return Err(CoercionError::MissingField {
                    entity: schema.entity,
                    field: name,
                })
            }
            Some(value) => value,
        };

        let converted = coercion
            .apply(value)
            .map_err(|reason| CoercionError::InvalidValue {
                entity: schema.entity,
                field: name,
                reason,
                raw: render_raw(value),
            })?;
        fields.insert(*name, converted);
    }

    let dropped = object.len().saturating_sub(fields.len());
    if dropped > 0 {
        trace!(entity = schema.entity, dropped, "Dropped fields outside the schema");
    }

    Ok(Record {
        entity: schema.entity,
        fields,
    })
}

/// Build a [`Node`] from its wire record.
pub fn node_from_wire(raw: &Value) -> Result<Node, CoercionError> {
    let mut record = deserialize(raw, &NODE_SCHEMA)?;
    Ok(Node {
        url: record.take_text("url")?,
        address: record.take_account("address")?,
        index: record.take_integer("index")?,
        deposit: record.take_big_integer("deposit")?,
        props: record.take_text("props")?,
        timeout: record.take_integer("timeout")?,
        register_time: record.take_integer("registerTime")?,
        weight: record.take_integer("weight")?,
    })
}

/// Build a [`NodeList`] from its wire record.
///
/// The `nodes` field is expanded here, element by element, after the
/// generic step.
pub fn node_list_from_wire(raw: &Value) -> Result<NodeList, CoercionError> {
    let mut record = deserialize(raw, &NODE_LIST_SCHEMA)?;

    let nodes = record
        .take_list("nodes")?
        .iter()
        .map(node_from_wire)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NodeList {
        nodes,
        contract: record.take_account("contract")?,
        registry_id: record.take_text("registryId")?,
        last_block_number: record.take_integer("lastBlockNumber")?,
        total_servers: record.take_integer("totalServers")?,
    })
}

fn render_raw(value: &Value) -> String {
    let mut rendered = value.to_string();
    if rendered.len() > MAX_RAW_IN_ERROR {
        let mut cut = MAX_RAW_IN_ERROR;
        while !rendered.is_char_boundary(cut) {
            cut -= 1;
        }
        rendered.truncate(cut);
        rendered.push_str("...");
    }
    rendered
}
