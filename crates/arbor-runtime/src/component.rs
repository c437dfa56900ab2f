use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::convert;
use crate::error::PropertyError;
use crate::schema::{CompiledSchema, ValueType};
use crate::value::Value;

// ── ComponentDefinition ───────────────────────────────────────────────────

/// Immutable, shareable handle to a compiled component schema; the factory
/// for [`ComponentInstance`]s.
///
/// Cloning shares the underlying schema, it never copies it. A definition
/// may outlive the [`Compiler`](crate::Compiler) that produced it; the
/// schema stays alive for as long as any definition or instance holds it.
#[derive(Debug, Clone)]
pub struct ComponentDefinition {
    schema: Arc<CompiledSchema>,
}

impl ComponentDefinition {
    pub(crate) fn new(schema: Arc<CompiledSchema>) -> Self {
        Self { schema }
    }

    /// The compiled component's declared name.
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Declared properties as `(name, type)` pairs, in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &ValueType)> + '_ {
        self.schema.properties.iter().map(|p| (p.name.as_str(), &p.ty))
    }

    /// Allocate a fresh instance with every slot deep-cloned from its
    /// schema default. Instances never share mutable state; mutating one
    /// is unobservable from any other.
    pub fn create(&self) -> ComponentInstance {
        let slots = self.schema.properties.iter().map(|p| p.default.clone()).collect();
        ComponentInstance { schema: Arc::clone(&self.schema), slots }
    }
}

// ── ComponentInstance ─────────────────────────────────────────────────────

/// A live component: one typed value slot per declared property.
///
/// Exclusively owned by its creator; get/set on a single instance are not
/// internally synchronized. Distinct instances own disjoint storage and may
/// be driven from distinct threads.
#[derive(Debug)]
pub struct ComponentInstance {
    schema: Arc<CompiledSchema>,
    slots: Vec<Value>,
}

impl ComponentInstance {
    /// Read a property by name, converted to the dynamic host
    /// representation. Unknown names fail; conversion itself cannot, since
    /// slots are always well-typed.
    pub fn get_property(&self, name: &str) -> Result<JsonValue, PropertyError> {
        let (idx, _) = self
            .schema
            .property(name)
            .ok_or_else(|| PropertyError::NoSuchProperty(name.to_string()))?;
        Ok(convert::to_json(&self.slots[idx]))
    }

    /// Write a property by name. The value is converted against the
    /// declared type first and the slot replaced only on success; a failed
    /// call leaves the prior value intact.
    pub fn set_property(&mut self, name: &str, value: &JsonValue) -> Result<(), PropertyError> {
        let (idx, decl) = self
            .schema
            .property(name)
            .ok_or_else(|| PropertyError::NoSuchProperty(name.to_string()))?;
        let converted = convert::from_json(&decl.ty, value)?;
        self.slots[idx] = converted;
        Ok(())
    }
}
