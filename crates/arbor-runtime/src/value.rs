use std::sync::Arc;

use crate::schema::{StructType, ValueType};

// ── Value ─────────────────────────────────────────────────────────────────

/// Internal typed value held in an instance's property slots.
///
/// Always well-typed against its declaring [`ValueType`]; conversion back
/// to the dynamic host representation is therefore total.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar; `int` and `float` declarations both land here.
    Number(f64),
    /// UTF-8 string.
    String(String),
    /// Struct-shaped value.
    Struct(StructValue),
}

/// Struct value with fields stored positionally against the type's
/// declared field order.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    pub ty: Arc<StructType>,
    pub fields: Vec<Value>,
}

impl StructValue {
    /// Field value by name, via the type's declared order.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.ty.field_index(name).and_then(|i| self.fields.get(i))
    }
}

impl Value {
    /// The zero value for a declared type: `false`, `0`, `""`, or a struct
    /// of zeroes. Used for properties and default-literal fields that
    /// declare no value. Terminates because recursive struct types are
    /// rejected during analysis.
    pub fn zero(ty: &ValueType) -> Value {
        match ty {
            ValueType::Bool => Value::Bool(false),
            ValueType::Number => Value::Number(0.0),
            ValueType::String => Value::String(String::new()),
            ValueType::Struct(st) => Value::Struct(StructValue {
                ty: Arc::clone(st),
                fields: st.fields.iter().map(|(_, fty)| Value::zero(fty)).collect(),
            }),
        }
    }
}
