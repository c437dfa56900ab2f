// ── Expr ──────────────────────────────────────────────────────────────────

/// A literal expression: a property default or an element binding value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Quoted string: `"hello"`
    Str(String),
    /// Floating-point literal: `16.0` or `16`
    Number(f64),
    /// Boolean literal: `true` / `false`
    Bool(bool),
    /// Object literal: `{ name: "Florian", age: 20 }`, entries in source order
    Object(Vec<(String, Expr)>),
    /// Unquoted identifier: used for enum-like binding values
    Ident(String),
}

// ── Access ────────────────────────────────────────────────────────────────

/// Property access modifier. A bare `property` is readable and writable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    In,
    Out,
    InOut,
}

// ── Struct declarations ───────────────────────────────────────────────────

/// A single `name: type` field inside a struct declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub type_name: String,
    pub line: usize,
    pub col: usize,
}

/// `export struct Player { name: string, age: int }`
#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub exported: bool,
    pub fields: Vec<FieldDecl>,
    pub line: usize,
    pub col: usize,
}

// ── Property declarations ─────────────────────────────────────────────────

/// `in-out property <string> name: "Initial";`
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub access: Access,
    pub type_name: String,
    pub name: String,
    pub default: Option<Expr>,
    pub line: usize,
    pub col: usize,
}

// ── Elements ──────────────────────────────────────────────────────────────

/// A `key: value;` binding inside an element block.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub key: String,
    pub value: Expr,
}

/// A nested element instantiation inside a component body.
///
/// ```acl
/// Rectangle {
///     width: 100;
///     Label { }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub name: String,
    pub bindings: Vec<Binding>,
    pub children: Vec<ElementNode>,
    pub line: usize,
    pub col: usize,
}

impl ElementNode {
    /// Look up a binding value by key.
    pub fn binding(&self, key: &str) -> Option<&Expr> {
        self.bindings.iter().find(|b| b.key == key).map(|b| &b.value)
    }
}

// ── Component declarations ────────────────────────────────────────────────

/// `export component App { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDecl {
    pub name: String,
    pub exported: bool,
    pub properties: Vec<PropertyDecl>,
    pub children: Vec<ElementNode>,
    pub line: usize,
    pub col: usize,
}

impl ComponentDecl {
    /// Look up a property declaration by name.
    pub fn property(&self, name: &str) -> Option<&PropertyDecl> {
        self.properties.iter().find(|p| p.name == name)
    }
}

// ── Import ────────────────────────────────────────────────────────────────

/// `import "player.acl";`
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub path: String,
    pub line: usize,
    pub col: usize,
}

// ── Document ──────────────────────────────────────────────────────────────

/// The top-level parse result for a `.acl` source file.
///
/// Declaration order is preserved everywhere: diagnostics, struct field
/// iteration, and root-component selection all depend on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub imports: Vec<Import>,
    pub structs: Vec<StructDecl>,
    pub components: Vec<ComponentDecl>,
}

impl Document {
    /// Look up a component declaration by name.
    pub fn component(&self, name: &str) -> Option<&ComponentDecl> {
        self.components.iter().find(|c| c.name == name)
    }

    /// The component `build_from_source` compiles: the last exported one.
    pub fn root_component(&self) -> Option<&ComponentDecl> {
        self.components.iter().rev().find(|c| c.exported)
    }
}
