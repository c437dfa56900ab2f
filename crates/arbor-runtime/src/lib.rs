//! Arbor runtime: compile Arbor Component Language (`.acl`) source into
//! reusable component definitions and marshal typed properties across a
//! dynamic host boundary.
//!
//! The flow is: source text → [`Compiler`] → [`ComponentDefinition`] →
//! [`ComponentInstance`] → `get_property` / `set_property`. Host callers
//! speak `serde_json::Value`; every read and write is checked against the
//! schema the compiler produced, with zero silent coercion between kinds.
//!
//! # Quick start
//!
//! ```rust
//! use arbor_runtime::Compiler;
//! use serde_json::json;
//!
//! let mut compiler = Compiler::new();
//! let definition = compiler
//!     .build_from_source(
//!         r#"export component App { in-out property <string> name: "Initial"; }"#,
//!         "app.acl",
//!     )
//!     .expect("source compiles");
//!
//! let mut instance = definition.create();
//! assert_eq!(instance.get_property("name").unwrap(), json!("Initial"));
//!
//! instance.set_property("name", &json!("Hello")).unwrap();
//! assert_eq!(instance.get_property("name").unwrap(), json!("Hello"));
//!
//! // Kinds never coerce: a Number is not a String.
//! let err = instance.set_property("name", &json!(42)).unwrap_err();
//! assert_eq!(err.to_string(), "expect String, got: Number");
//! ```

mod analyze;
pub mod compiler;
pub mod component;
pub mod convert;
pub mod diag;
pub mod error;
pub mod logging;
pub mod schema;
pub mod value;

pub use compiler::Compiler;
pub use component::{ComponentDefinition, ComponentInstance};
pub use diag::{Diagnostic, Severity};
pub use error::{ConvertError, PropertyError};
pub use schema::{CompiledSchema, PropertyDeclaration, StructType, ValueType};
pub use value::{StructValue, Value};

/// Everything a host embedding typically needs.
pub mod prelude {
    pub use crate::compiler::Compiler;
    pub use crate::component::{ComponentDefinition, ComponentInstance};
    pub use crate::diag::{Diagnostic, Severity};
    pub use crate::error::{ConvertError, PropertyError};
    pub use crate::schema::ValueType;
}
