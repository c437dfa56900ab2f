//! Semantic analysis: a parsed [`Document`] plus compiler configuration in,
//! a [`CompiledSchema`] plus diagnostics out.
//!
//! Analysis resolves imports against the include paths, builds struct types
//! (rejecting recursion and duplicate fields), type-checks property default
//! expressions, and selects the last exported component as the root.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arbor_acl::ast::{ComponentDecl, Document, ElementNode, Expr, StructDecl};

use crate::diag::{Diagnostic, Severity};
use crate::schema::{CompiledSchema, PropertyDeclaration, StructType, ValueType};
use crate::value::{StructValue, Value};

// ── CompileOptions ────────────────────────────────────────────────────────

/// Configuration snapshot threaded from the [`Compiler`](crate::Compiler)
/// into a single build.
#[derive(Debug, Clone, Default)]
pub(crate) struct CompileOptions {
    pub include_paths: Vec<PathBuf>,
    /// Widget-library flavor; recorded for the build, selects nothing in
    /// this core (rendering is a separate subsystem).
    pub style: Option<String>,
}

// ── Entry point ───────────────────────────────────────────────────────────

/// Analyze a parsed document.
///
/// Returns the schema compiled from the last exported component, or `None`
/// when any Error-severity diagnostic was produced. The diagnostic list is
/// returned either way, sorted by source position.
pub(crate) fn analyze(
    doc: &Document,
    path: &Path,
    opts: &CompileOptions,
) -> (Option<CompiledSchema>, Vec<Diagnostic>) {
    if let Some(style) = &opts.style {
        log::debug!("compiling {} with style {:?}", path.display(), style);
    }

    let mut an = Analyzer {
        opts,
        path: path.display().to_string(),
        diags: Vec::new(),
        struct_decls: HashMap::new(),
        resolved: HashMap::new(),
        resolving: Vec::new(),
        component_names: HashSet::new(),
    };

    // Imports first: they lexically precede every declaration.
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut visited = HashSet::new();
    visited.insert(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()));
    an.load_imports(doc, &base_dir, &mut visited);

    for s in &doc.structs {
        if an.struct_decls.contains_key(&s.name) {
            an.error(format!("duplicate struct declaration `{}`", s.name), s.line, s.col);
        } else {
            an.struct_decls.insert(s.name.clone(), s.clone());
        }
    }
    for c in &doc.components {
        if !an.component_names.insert(c.name.clone()) {
            an.error(format!("duplicate component declaration `{}`", c.name), c.line, c.col);
        }
    }

    // Analyze every component; the schema comes from the last exported one.
    let root_name = doc.root_component().map(|c| c.name.clone());
    let mut schema = None;
    for comp in &doc.components {
        let compiled = an.check_component(comp);
        if Some(&comp.name) == root_name.as_ref() {
            schema = Some(compiled);
        }
    }
    if root_name.is_none() {
        an.error("no exported component", 1, 1);
    }

    let failed = an.diags.iter().any(|d| d.severity == Severity::Error);
    an.diags.sort_by(|a, b| {
        (a.path.as_str(), a.line, a.column).cmp(&(b.path.as_str(), b.line, b.column))
    });
    (if failed { None } else { schema }, an.diags)
}

// ── Analyzer ──────────────────────────────────────────────────────────────

struct Analyzer<'a> {
    opts: &'a CompileOptions,
    /// Root source path, for diagnostics.
    path: String,
    diags: Vec<Diagnostic>,
    /// Struct declarations in scope: imported exports, then local ones.
    struct_decls: HashMap<String, StructDecl>,
    /// Memoized resolved struct types.
    resolved: HashMap<String, Arc<StructType>>,
    /// Names currently being resolved, for recursion detection.
    resolving: Vec<String>,
    /// Component names in scope, for element checking.
    component_names: HashSet<String>,
}

impl Analyzer<'_> {
    fn error(&mut self, msg: impl Into<String>, line: usize, col: usize) {
        self.diags.push(Diagnostic::error(msg, self.path.clone(), line, col));
    }

    fn warning(&mut self, msg: impl Into<String>, line: usize, col: usize) {
        self.diags.push(Diagnostic::warning(msg, self.path.clone(), line, col));
    }

    // ── Imports ───────────────────────────────────────────────────────────

    /// Bring the exported declarations of every imported document into
    /// scope. Each file is loaded at most once; revisiting a file (cycles
    /// included) is a no-op.
    fn load_imports(&mut self, doc: &Document, base_dir: &Path, visited: &mut HashSet<PathBuf>) {
        for import in &doc.imports {
            let Some(file) = self.resolve_import(base_dir, &import.path) else {
                self.error(
                    format!("cannot find imported file {:?}", import.path),
                    import.line,
                    import.col,
                );
                continue;
            };
            if !visited.insert(file.canonicalize().unwrap_or_else(|_| file.clone())) {
                continue;
            }
            log::debug!("importing {}", file.display());
            let source = match std::fs::read_to_string(&file) {
                Ok(s) => s,
                Err(e) => {
                    self.error(
                        format!("cannot read {}: {}", file.display(), e),
                        import.line,
                        import.col,
                    );
                    continue;
                }
            };
            let imported = match arbor_acl::parse_str(&source) {
                Ok(d) => d,
                Err(e) => {
                    self.diags.push(Diagnostic::error(
                        e.message,
                        file.display().to_string(),
                        e.line,
                        e.col,
                    ));
                    continue;
                }
            };
            let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
            self.load_imports(&imported, &dir, visited);
            for s in &imported.structs {
                if s.exported && !self.struct_decls.contains_key(&s.name) {
                    self.struct_decls.insert(s.name.clone(), s.clone());
                }
            }
            for c in &imported.components {
                if c.exported {
                    self.component_names.insert(c.name.clone());
                }
            }
        }
    }

    /// Resolution order: the importing file's directory, then the include
    /// paths in configuration order.
    fn resolve_import(&self, base_dir: &Path, rel: &str) -> Option<PathBuf> {
        std::iter::once(base_dir)
            .chain(self.opts.include_paths.iter().map(PathBuf::as_path))
            .map(|dir| dir.join(rel))
            .find(|candidate| candidate.is_file())
    }

    // ── Types ─────────────────────────────────────────────────────────────

    fn resolve_type(&mut self, name: &str, line: usize, col: usize) -> Option<ValueType> {
        match name {
            "bool" => Some(ValueType::Bool),
            "int" | "float" => Some(ValueType::Number),
            "string" => Some(ValueType::String),
            _ if self.struct_decls.contains_key(name) => {
                self.resolve_struct(name, line, col).map(ValueType::Struct)
            }
            _ => {
                self.error(format!("unknown type name `{}`", name), line, col);
                None
            }
        }
    }

    fn resolve_struct(&mut self, name: &str, line: usize, col: usize) -> Option<Arc<StructType>> {
        if let Some(st) = self.resolved.get(name) {
            return Some(Arc::clone(st));
        }
        if self.resolving.iter().any(|n| n == name) {
            self.error(format!("recursive struct `{}`", name), line, col);
            return None;
        }
        let decl = self.struct_decls.get(name)?.clone();

        self.resolving.push(name.to_string());
        let mut fields: Vec<(String, ValueType)> = Vec::with_capacity(decl.fields.len());
        let mut complete = true;
        for f in &decl.fields {
            if fields.iter().any(|(n, _)| n == &f.name) {
                self.error(
                    format!("duplicate field `{}` in struct `{}`", f.name, decl.name),
                    f.line,
                    f.col,
                );
                complete = false;
                continue;
            }
            match self.resolve_type(&f.type_name, f.line, f.col) {
                Some(ty) => fields.push((f.name.clone(), ty)),
                None => complete = false,
            }
        }
        self.resolving.pop();

        if !complete {
            return None;
        }
        let st = Arc::new(StructType { name: decl.name.clone(), fields });
        self.resolved.insert(name.to_string(), Arc::clone(&st));
        Some(st)
    }

    // ── Components ────────────────────────────────────────────────────────

    /// Type-check one component's properties and elements. The returned
    /// schema is only handed out by [`analyze`] when no error was recorded.
    fn check_component(&mut self, comp: &ComponentDecl) -> CompiledSchema {
        let mut properties: Vec<PropertyDeclaration> = Vec::new();
        for p in &comp.properties {
            if properties.iter().any(|d| d.name == p.name) {
                self.error(
                    format!("duplicate property `{}` on component `{}`", p.name, comp.name),
                    p.line,
                    p.col,
                );
                continue;
            }
            let Some(ty) = self.resolve_type(&p.type_name, p.line, p.col) else {
                continue;
            };
            let default = match &p.default {
                Some(expr) => match self.eval_default(&ty, expr, p.line, p.col) {
                    Some(v) => v,
                    None => continue,
                },
                None => Value::zero(&ty),
            };
            properties.push(PropertyDeclaration { name: p.name.clone(), ty, default });
        }
        self.check_elements(&comp.children);
        CompiledSchema { name: comp.name.clone(), properties }
    }

    fn check_elements(&mut self, elements: &[ElementNode]) {
        for el in elements {
            if !self.component_names.contains(&el.name) {
                // Widget resolution lives in the rendering subsystem; the
                // checker stays permissive about element vocabulary.
                self.warning(format!("unknown element `{}`", el.name), el.line, el.col);
            }
            self.check_elements(&el.children);
        }
    }

    // ── Defaults ──────────────────────────────────────────────────────────

    /// Evaluate a default expression against the declared type. Object
    /// literals follow the set-time conversion policy for extra keys
    /// (ignored); a missing field takes the field type's zero value, since
    /// compile time is the only place defaults exist.
    fn eval_default(&mut self, ty: &ValueType, expr: &Expr, line: usize, col: usize) -> Option<Value> {
        match (ty, expr) {
            (ValueType::Bool, Expr::Bool(b)) => Some(Value::Bool(*b)),
            (ValueType::Number, Expr::Number(n)) => Some(Value::Number(*n)),
            (ValueType::String, Expr::Str(s)) => Some(Value::String(s.clone())),
            (ValueType::Struct(st), Expr::Object(entries)) => {
                let st = Arc::clone(st);
                let mut fields = Vec::with_capacity(st.fields.len());
                let mut complete = true;
                for (fname, fty) in &st.fields {
                    match entries.iter().find(|(k, _)| k == fname) {
                        Some((_, fexpr)) => match self.eval_default(fty, fexpr, line, col) {
                            Some(v) => fields.push(v),
                            None => complete = false,
                        },
                        None => fields.push(Value::zero(fty)),
                    }
                }
                complete.then(|| Value::Struct(StructValue { ty: st, fields }))
            }
            (ty, expr) => {
                self.error(
                    format!("expect {}, got: {}", ty.label(), expr_kind(expr)),
                    line,
                    col,
                );
                None
            }
        }
    }
}

/// Kind label of a default expression, mirroring the host-level labels.
fn expr_kind(expr: &Expr) -> &'static str {
    match expr {
        Expr::Str(_) => "String",
        Expr::Number(_) => "Number",
        Expr::Bool(_) => "Boolean",
        Expr::Object(_) => "Object",
        Expr::Ident(_) => "Identifier",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_acl::parse_str;

    fn run(src: &str) -> (Option<CompiledSchema>, Vec<Diagnostic>) {
        let doc = parse_str(src).unwrap();
        analyze(&doc, Path::new("test.acl"), &CompileOptions::default())
    }

    fn errors(diags: &[Diagnostic]) -> Vec<&str> {
        diags
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| d.message.as_str())
            .collect()
    }

    #[test]
    fn empty_component_compiles() {
        let (schema, diags) = run("export component App { }");
        let schema = schema.unwrap();
        assert_eq!(schema.name, "App");
        assert!(schema.properties.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn property_without_default_gets_zero_value() {
        let (schema, _) = run("export component App { in-out property <string> name; }");
        let schema = schema.unwrap();
        assert_eq!(schema.properties[0].default, Value::String(String::new()));
    }

    #[test]
    fn default_is_type_checked() {
        let (schema, diags) = run(r#"export component App { property <float> age: "old"; }"#);
        assert!(schema.is_none());
        assert_eq!(errors(&diags), ["expect Number, got: String"]);
    }

    #[test]
    fn unknown_type_name_is_an_error() {
        let (schema, diags) = run("export component App { property <Vec> v; }");
        assert!(schema.is_none());
        assert_eq!(errors(&diags), ["unknown type name `Vec`"]);
    }

    #[test]
    fn duplicate_property_is_an_error() {
        let (schema, diags) = run(
            "export component App { property <int> x; property <int> x; }",
        );
        assert!(schema.is_none());
        assert_eq!(errors(&diags), ["duplicate property `x` on component `App`"]);
    }

    #[test]
    fn no_exported_component_is_an_error() {
        let (schema, diags) = run("component Inner { }");
        assert!(schema.is_none());
        assert_eq!(errors(&diags), ["no exported component"]);
    }

    #[test]
    fn last_exported_component_wins() {
        let (schema, _) = run(
            "export component First { } component Middle { } export component Last { }",
        );
        assert_eq!(schema.unwrap().name, "Last");
    }

    #[test]
    fn struct_default_fills_missing_fields_with_zero() {
        let (schema, diags) = run(r#"
            export struct Player { name: string, age: int }
            export component App {
                in-out property <Player> player: { name: "Florian" };
            }
        "#);
        assert!(diags.is_empty());
        let schema = schema.unwrap();
        let Value::Struct(sv) = &schema.properties[0].default else { panic!("expected struct") };
        assert_eq!(sv.field("name"), Some(&Value::String("Florian".into())));
        assert_eq!(sv.field("age"), Some(&Value::Number(0.0)));
    }

    #[test]
    fn recursive_struct_is_an_error() {
        let (schema, diags) = run(r#"
            struct Node { next: Node }
            export component App { property <Node> head; }
        "#);
        assert!(schema.is_none());
        assert_eq!(errors(&diags), ["recursive struct `Node`"]);
    }

    #[test]
    fn duplicate_struct_field_is_an_error() {
        let (schema, diags) = run(r#"
            struct P { x: int, x: int }
            export component App { property <P> p; }
        "#);
        assert!(schema.is_none());
        assert_eq!(errors(&diags), ["duplicate field `x` in struct `P`"]);
    }

    #[test]
    fn unknown_element_is_a_warning_only() {
        let (schema, diags) = run("export component App { Rectangle { width: 10; } }");
        assert!(schema.is_some());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
        assert_eq!(diags[0].message, "unknown element `Rectangle`");
    }

    #[test]
    fn element_naming_a_known_component_is_clean() {
        let (schema, diags) = run("component Header { } export component App { Header { } }");
        assert!(schema.is_some());
        assert!(diags.is_empty());
    }

    #[test]
    fn ident_default_is_rejected() {
        let (schema, diags) = run("export component App { property <string> s: hello; }");
        assert!(schema.is_none());
        assert_eq!(errors(&diags), ["expect String, got: Identifier"]);
    }

    #[test]
    fn missing_import_is_an_error() {
        let (schema, diags) = run(r#"import "nope.acl"; export component App { }"#);
        assert!(schema.is_none());
        assert_eq!(errors(&diags), [r#"cannot find imported file "nope.acl""#]);
    }

    #[test]
    fn diagnostics_are_sorted_by_position() {
        let (_, diags) = run(
            "export component App {\n    property <A> a;\n    property <B> b;\n}",
        );
        assert_eq!(diags[0].line, 2);
        assert_eq!(diags[1].line, 3);
    }
}
