use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::analyze::{self, CompileOptions};
use crate::component::ComponentDefinition;
use crate::diag::Diagnostic;

// ── Compiler ──────────────────────────────────────────────────────────────

/// Compiles `.acl` source into reusable [`ComponentDefinition`]s.
///
/// Holds pure configuration (include paths, style) between builds; the same
/// source with the same configuration compiles to the same schema, modulo
/// filesystem reads for imports. One `Compiler` is meant to be driven from
/// a single thread; distinct compilers are fully independent.
pub struct Compiler {
    include_paths: Vec<PathBuf>,
    style: Option<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Compiler {
    pub fn new() -> Self {
        Self { include_paths: Vec::new(), style: None, diagnostics: Vec::new() }
    }

    /// Replace the ordered list of directories searched for imports.
    /// Existence is not checked here; resolution happens per build.
    pub fn set_include_paths(&mut self, paths: Vec<PathBuf>) {
        self.include_paths = paths;
    }

    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    /// Select a widget-library style for subsequent builds, or `None` for
    /// the default. Recorded per build; this core attaches no further
    /// semantics to it.
    pub fn set_style(&mut self, style: Option<String>) {
        self.style = style;
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// Diagnostics from the most recent [`build_from_source`] call.
    ///
    /// This is the side channel for compilation failure: `build_from_source`
    /// answers `None` and the reasons live here.
    ///
    /// [`build_from_source`]: Compiler::build_from_source
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Compile `source` (nominally located at `path`, which anchors import
    /// resolution and diagnostics) into a definition of its last exported
    /// component.
    ///
    /// Returns `None` when no component could be produced, i.e. on a parse
    /// error or any Error-severity diagnostic. Warnings alone still yield
    /// a definition.
    pub fn build_from_source(
        &mut self,
        source: &str,
        path: impl AsRef<Path>,
    ) -> Option<ComponentDefinition> {
        let path = path.as_ref();
        self.diagnostics.clear();

        let doc = match arbor_acl::parse_str(source) {
            Ok(doc) => doc,
            Err(e) => {
                self.diagnostics.push(Diagnostic::error(
                    e.message,
                    path.display().to_string(),
                    e.line,
                    e.col,
                ));
                log::warn!("{}: parse failed", path.display());
                return None;
            }
        };

        let opts = CompileOptions {
            include_paths: self.include_paths.clone(),
            style: self.style.clone(),
        };
        let (schema, diags) = analyze::analyze(&doc, path, &opts);
        self.diagnostics = diags;

        match schema {
            Some(schema) => {
                log::debug!(
                    "compiled component `{}` ({} properties, {} diagnostics)",
                    schema.name,
                    schema.properties.len(),
                    self.diagnostics.len()
                );
                Some(ComponentDefinition::new(Arc::new(schema)))
            }
            None => {
                log::warn!(
                    "{}: compilation failed with {} diagnostics",
                    path.display(),
                    self.diagnostics.len()
                );
                None
            }
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::Severity;
    use std::io::Write;

    #[test]
    fn include_paths_default_empty_and_replace_whole() {
        let mut compiler = Compiler::new();
        assert!(compiler.include_paths().is_empty());

        compiler.set_include_paths(vec![
            PathBuf::from("path/one/"),
            PathBuf::from("path/two/"),
            PathBuf::from("path/three/"),
        ]);
        assert_eq!(compiler.include_paths().len(), 3);
        assert_eq!(compiler.include_paths()[0], Path::new("path/one/"));
        assert_eq!(compiler.include_paths()[1], Path::new("path/two/"));
        assert_eq!(compiler.include_paths()[2], Path::new("path/three/"));
    }

    #[test]
    fn style_defaults_to_none() {
        let mut compiler = Compiler::new();
        assert_eq!(compiler.style(), None);

        compiler.set_style(Some("fluent".into()));
        assert_eq!(compiler.style(), Some("fluent"));

        compiler.set_style(None);
        assert_eq!(compiler.style(), None);
    }

    #[test]
    fn build_from_source_names_the_component() {
        let mut compiler = Compiler::new();
        let definition = compiler.build_from_source("export component App { }", "");
        assert_eq!(definition.map(|d| d.name().to_string()), Some("App".into()));
        assert!(compiler.diagnostics().is_empty());
    }

    #[test]
    fn parse_error_surfaces_as_diagnostic() {
        let mut compiler = Compiler::new();
        let definition = compiler.build_from_source("export component App {", "broken.acl");
        assert!(definition.is_none());
        assert_eq!(compiler.diagnostics().len(), 1);
        assert_eq!(compiler.diagnostics()[0].severity, Severity::Error);
        assert_eq!(compiler.diagnostics()[0].path, "broken.acl");
    }

    #[test]
    fn diagnostics_reset_between_builds() {
        let mut compiler = Compiler::new();
        assert!(compiler.build_from_source("component Hidden { }", "").is_none());
        assert!(!compiler.diagnostics().is_empty());

        assert!(compiler.build_from_source("export component App { }", "").is_some());
        assert!(compiler.diagnostics().is_empty());
    }

    #[test]
    fn warnings_still_yield_a_definition() {
        let mut compiler = Compiler::new();
        let definition = compiler.build_from_source(
            "export component App { Rectangle { } }",
            "",
        );
        assert!(definition.is_some());
        assert_eq!(compiler.diagnostics().len(), 1);
        assert_eq!(compiler.diagnostics()[0].severity, Severity::Warning);
    }

    #[test]
    fn imports_resolve_through_include_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut lib = std::fs::File::create(dir.path().join("player.acl")).unwrap();
        writeln!(lib, "export struct Player {{ name: string, age: int }}").unwrap();

        let source = r#"
            import "player.acl";
            export component App {
                in-out property <Player> player: { name: "Florian", age: 20, };
            }
        "#;

        // Without the include path the import cannot be found.
        let mut compiler = Compiler::new();
        assert!(compiler.build_from_source(source, "app.acl").is_none());

        compiler.set_include_paths(vec![dir.path().to_path_buf()]);
        let definition = compiler.build_from_source(source, "app.acl").unwrap();
        let instance = definition.create();
        assert_eq!(
            instance.get_property("player").unwrap(),
            serde_json::json!({ "name": "Florian", "age": 20.0 })
        );
    }

    #[test]
    fn imports_resolve_relative_to_the_source_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut lib = std::fs::File::create(dir.path().join("shared.acl")).unwrap();
        writeln!(lib, "export struct Flag {{ on: bool }}").unwrap();
        let app_path = dir.path().join("app.acl");

        let mut compiler = Compiler::new();
        let definition = compiler.build_from_source(
            r#"import "shared.acl"; export component App { property <Flag> f; }"#,
            &app_path,
        );
        assert!(definition.is_some(), "diagnostics: {:?}", compiler.diagnostics());
    }

    #[test]
    fn import_cycles_load_each_file_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.acl"),
            r#"import "b.acl"; export struct A { b: B }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b.acl"),
            r#"import "a.acl"; export struct B { n: int }"#,
        )
        .unwrap();

        let mut compiler = Compiler::new();
        compiler.set_include_paths(vec![dir.path().to_path_buf()]);
        let definition = compiler.build_from_source(
            r#"import "a.acl"; export component App { property <A> a; }"#,
            "app.acl",
        );
        assert!(definition.is_some(), "diagnostics: {:?}", compiler.diagnostics());
    }
}
