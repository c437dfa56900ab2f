use std::fmt;
use std::sync::Arc;

use crate::value::Value;

// ── ValueType ─────────────────────────────────────────────────────────────

/// The declared type of a component property or struct field.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    Bool,
    Number,
    String,
    Struct(Arc<StructType>),
}

impl ValueType {
    /// Stable human-readable kind label, as used in conversion errors.
    pub fn label(&self) -> &'static str {
        match self {
            ValueType::Bool => "Boolean",
            ValueType::Number => "Number",
            ValueType::String => "String",
            ValueType::Struct(_) => "Object",
        }
    }
}

impl fmt::Display for ValueType {
    /// Source-level spelling: `bool`, `float`, `string`, or the struct name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Bool => write!(f, "bool"),
            ValueType::Number => write!(f, "float"),
            ValueType::String => write!(f, "string"),
            ValueType::Struct(st) => write!(f, "{}", st.name),
        }
    }
}

// ── StructType ────────────────────────────────────────────────────────────

/// A struct type compiled from a `struct` declaration.
///
/// Field order is declaration order and is relied on for deterministic
/// read-back; field names are unique (enforced during analysis).
#[derive(Debug, PartialEq)]
pub struct StructType {
    pub name: String,
    pub fields: Vec<(String, ValueType)>,
}

impl StructType {
    /// Positional index of a field, by exact name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _)| n == name)
    }
}

// ── PropertyDeclaration ───────────────────────────────────────────────────

/// One declared property of a compiled component.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDeclaration {
    pub name: String,
    pub ty: ValueType,
    /// Typed default, evaluated from the declared default expression (or the
    /// type's zero value) when the schema was compiled. Instances deep-clone
    /// this at creation; it is never aliased.
    pub default: Value,
}

// ── CompiledSchema ────────────────────────────────────────────────────────

/// The immutable output of one successful compilation: the root component's
/// name plus its property declarations in declaration order.
///
/// Shared via `Arc` by every definition and instance derived from it.
#[derive(Debug, PartialEq)]
pub struct CompiledSchema {
    pub name: String,
    pub properties: Vec<PropertyDeclaration>,
}

impl CompiledSchema {
    /// Look up a property by exact name, returning its slot index and
    /// declaration. Unknown names are a caller-visible error, not a default.
    pub fn property(&self, name: &str) -> Option<(usize, &PropertyDeclaration)> {
        self.properties
            .iter()
            .enumerate()
            .find(|(_, p)| p.name == name)
    }
}
