//! Lexer, parser, and AST for the **Arbor Component Language** (`.acl`).
//!
//! This crate is intentionally dependency-free so it can be consumed by
//! language-server tooling, editors, and linters without pulling in the
//! runtime or any host-boundary code.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `Document`, `ComponentDecl`, `StructDecl`, `PropertyDecl`, `Expr` |
//! | [`error`] | `ParseError` |
//! | [`lexer`] | `Lexer`, `Token` |
//! | [`parser`] | `parse_str` entry point |
//!
//! # Quick start
//!
//! ```rust
//! use arbor_acl::parse_str;
//!
//! let src = r#"
//!     export component App {
//!         in-out property <string> name: "Initial";
//!     }
//! "#;
//!
//! let doc = parse_str(src).unwrap();
//! assert_eq!(doc.components[0].name, "App");
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::Document;
pub use error::ParseError;
pub use parser::parse_str;
